//! Query record as the backend decodes it.
//!
//! The backend receives the raw JSON of each query and turns `queryText` into a pipeline
//! value before handing it to the database driver. Query text goes through the same decoder
//! as the editor's gate, so any text that triggered a run also decodes here.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DocQueryError, Result};
use crate::query::gate;

/// Fields the backend reads from a query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryModel {
    #[serde(rename = "queryText", default)]
    pub query_text: String,

    #[serde(default)]
    pub collection: String,

    #[serde(rename = "db", default)]
    pub db_name: String,
}

impl QueryModel {
    /// Decode a query from the raw JSON the host transports
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| DocQueryError::invalid_input(format!("json unmarshal: {e}")))
    }

    /// Parse the query text into a pipeline value
    pub fn pipeline(&self) -> Result<Value> {
        let pipeline = gate::decode(&self.query_text).map_err(|e| {
            DocQueryError::invalid_query(format!("failed to parse query as pipeline: {e}"))
        })?;
        tracing::trace!(db = %self.db_name, collection = %self.collection, "parsed pipeline");
        Ok(pipeline)
    }
}
