//! Query Record and Query Form
//!
//! The query record is owned by the host. The editor in [`editor`] replaces it wholesale on
//! every edit and decides, through the gate in [`gate`], whether the edit should also request
//! execution. [`model`] is the same record as the backend decodes it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod editor;
pub mod gate;
pub mod model;

/// Database used by a query with no prior value
pub const DEFAULT_DB: &str = "local";

/// Collection used by a query with no prior value
pub const DEFAULT_COLLECTION: &str = "startup_log";

/// Query text used by a query with no prior value (an empty pipeline)
pub const DEFAULT_QUERY_TEXT: &str = "[]";

/// Query record exchanged with the host
///
/// Missing fields take the default values when decoded. Host-owned fields such as
/// `refId`, `hide` or `datasource` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    /// Target database name (free text, the backend decides validity)
    pub db: String,

    /// Target collection name (free text, the backend decides validity)
    pub collection: String,

    /// Filter or aggregation expression as typed by the user
    pub query_text: String,

    /// Host-owned fields this crate never interprets
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            db: DEFAULT_DB.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            query_text: DEFAULT_QUERY_TEXT.to_string(),
            extra: Map::new(),
        }
    }
}

impl QuerySpec {
    /// Create a query record with the given fields and no host-owned extras
    pub fn new(
        db: impl Into<String>,
        collection: impl Into<String>,
        query_text: impl Into<String>,
    ) -> Self {
        Self {
            db: db.into(),
            collection: collection.into(),
            query_text: query_text.into(),
            extra: Map::new(),
        }
    }

    /// Copy of this record with `db` replaced
    #[must_use]
    pub fn with_db(&self, db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            ..self.clone()
        }
    }

    /// Copy of this record with `collection` replaced
    #[must_use]
    pub fn with_collection(&self, collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..self.clone()
        }
    }

    /// Copy of this record with `queryText` replaced
    #[must_use]
    pub fn with_query_text(&self, query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_query() {
        let query = QuerySpec::default();
        assert_eq!(query.db, "local");
        assert_eq!(query.collection, "startup_log");
        assert_eq!(query.query_text, "[]");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(QuerySpec::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "db": "local",
                "collection": "startup_log",
                "queryText": "[]"
            })
        );
    }

    #[test]
    fn test_partial_record_takes_defaults() {
        let query: QuerySpec = serde_json::from_str(r#"{"collection": "logs"}"#).unwrap();
        assert_eq!(query, QuerySpec::new("local", "logs", "[]"));
    }

    #[test]
    fn test_host_fields_survive_replacement() {
        let raw = r#"{"refId": "A", "db": "x", "collection": "y", "queryText": "{}"}"#;
        let query: QuerySpec = serde_json::from_str(raw).unwrap();
        let edited = query.with_collection("z");

        assert_eq!(edited.extra.get("refId"), Some(&Value::from("A")));
        assert_eq!(edited.db, "x");
        assert_eq!(edited.collection, "z");
        assert_eq!(edited.query_text, "{}");

        let json = serde_json::to_value(&edited).unwrap();
        assert_eq!(json["refId"], "A");
    }
}
