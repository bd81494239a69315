//! Connection Configuration Record
//!
//! This module models the datasource configuration record the host owns and persists.
//!
//! # Record Shape
//! - `jsonData.mongoConnectionString` - plain setting, always transported
//! - `secureJsonData.{password, sslClientCert}` - secrets, transported only on change
//! - `secureJsonFields.{password, sslClientCert}` - read-only flags reporting whether the host
//!   already stores a value for each secret
//!
//! Any other host-owned field (`id`, `name`, `access`, ...) is preserved verbatim so a whole
//! record replacement never drops data the form does not know about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod editor;
pub mod settings;

/// Secret configuration fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretField {
    /// Database password
    Password,
    /// PEM bundle with the TLS client certificate and key
    SslClientCert,
}

impl SecretField {
    /// All secret fields, in form order
    pub const ALL: [Self; 2] = [Self::Password, Self::SslClientCert];

    /// Field name on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::SslClientCert => "sslClientCert",
        }
    }

    /// Form label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::SslClientCert => "SSL Client Certificate",
        }
    }

    /// Placeholder shown while the field is empty and not configured
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::SslClientCert => "SSL Client  Certificate contents",
        }
    }
}

impl std::fmt::Display for SecretField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plain datasource settings (`jsonData`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonData {
    /// Connection string, e.g. `mongodb://user@host:27017/?directConnection=true`
    #[serde(default)]
    pub mongo_connection_string: String,

    /// Settings written by other tooling
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Secret values entered in this session (`secureJsonData`)
///
/// A `None` field was not touched and is not sent to the host.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureJsonData {
    /// Password entered for the connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// PEM contents of the TLS client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_client_cert: Option<String>,
}

impl SecureJsonData {
    /// Value entered for `field`, if any
    #[must_use]
    pub fn get(&self, field: SecretField) -> Option<&str> {
        match field {
            SecretField::Password => self.password.as_deref(),
            SecretField::SslClientCert => self.ssl_client_cert.as_deref(),
        }
    }

    /// Copy with `field` set to `value`
    #[must_use]
    pub fn with(&self, field: SecretField, value: String) -> Self {
        let mut next = self.clone();
        match field {
            SecretField::Password => next.password = Some(value),
            SecretField::SslClientCert => next.ssl_client_cert = Some(value),
        }
        next
    }
}

// WARNING: Sensitive data, only report which secrets are present
impl std::fmt::Debug for SecureJsonData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureJsonData")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ssl_client_cert", &self.ssl_client_cert.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Whether the host already stores each secret (`secureJsonFields`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureJsonFields {
    #[serde(default)]
    pub password: bool,

    #[serde(default)]
    pub ssl_client_cert: bool,

    /// Flags for secrets this form does not edit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecureJsonFields {
    /// Configured flag for `field`
    #[must_use]
    pub const fn get(&self, field: SecretField) -> bool {
        match field {
            SecretField::Password => self.password,
            SecretField::SslClientCert => self.ssl_client_cert,
        }
    }

    /// Copy with the flag for `field` set to `configured`
    #[must_use]
    pub fn with(&self, field: SecretField, configured: bool) -> Self {
        let mut next = self.clone();
        match field {
            SecretField::Password => next.password = configured,
            SecretField::SslClientCert => next.ssl_client_cert = configured,
        }
        next
    }
}

/// Datasource configuration record exchanged with the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Plain settings
    #[serde(default)]
    pub json_data: JsonData,

    /// Secrets entered in this session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_data: Option<SecureJsonData>,

    /// Configured flags reported by the host
    #[serde(default)]
    pub secure_json_fields: SecureJsonFields,

    /// Host-owned fields this crate never interprets
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionConfig {
    /// Record with only a connection string set
    pub fn with_connection_string(connection_string: impl Into<String>) -> Self {
        Self {
            json_data: JsonData {
                mongo_connection_string: connection_string.into(),
                extra: Map::new(),
            },
            ..Self::default()
        }
    }

    /// Connection string, empty when unset
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.json_data.mongo_connection_string
    }

    /// Whether the host reports a stored value for `field`
    #[must_use]
    pub fn is_configured(&self, field: SecretField) -> bool {
        self.secure_json_fields.get(field)
    }

    /// Value entered for `field` in this session, empty when untouched
    #[must_use]
    pub fn secret_value(&self, field: SecretField) -> &str {
        self.secure_json_data.as_ref().and_then(|d| d.get(field)).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_field_names() {
        let record = ConnectionConfig {
            json_data: JsonData {
                mongo_connection_string: "mongodb://localhost".into(),
                extra: Map::new(),
            },
            secure_json_data: Some(SecureJsonData {
                password: Some("pw".into()),
                ssl_client_cert: None,
            }),
            secure_json_fields: SecureJsonFields {
                password: false,
                ssl_client_cert: true,
                extra: Map::new(),
            },
            extra: Map::new(),
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "jsonData": {"mongoConnectionString": "mongodb://localhost"},
                "secureJsonData": {"password": "pw"},
                "secureJsonFields": {"password": false, "sslClientCert": true}
            })
        );
    }

    #[test]
    fn test_decode_host_record() {
        let record: ConnectionConfig = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Mongo",
                "jsonData": {"mongoConnectionString": "mongodb://db:27017", "defaultDBName": "x"},
                "secureJsonFields": {"password": true}
            }"#,
        )
        .unwrap();

        assert_eq!(record.connection_string(), "mongodb://db:27017");
        assert!(record.is_configured(SecretField::Password));
        assert!(!record.is_configured(SecretField::SslClientCert));
        assert_eq!(record.secret_value(SecretField::Password), "");
        assert_eq!(record.extra.get("id"), Some(&Value::from(7)));
        assert_eq!(record.json_data.extra.get("defaultDBName"), Some(&Value::from("x")));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let data = SecureJsonData {
            password: Some("hunter2".into()),
            ssl_client_cert: None,
        };
        let rendered = format!("{data:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_secret_field_names() {
        assert_eq!(SecretField::Password.as_str(), "password");
        assert_eq!(SecretField::SslClientCert.as_str(), "sslClientCert");
        assert_eq!(SecretField::SslClientCert.label(), "SSL Client Certificate");
    }
}
