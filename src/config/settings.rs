//! Datasource settings as the backend receives them.
//!
//! The host hands the backend the plain `jsonData` bytes and a map of decrypted secrets.
//! Missing secrets decode as empty strings.

use std::collections::HashMap;

use serde::Deserialize;

use crate::config::SecretField;
use crate::error::{DocQueryError, Result};

#[derive(Deserialize)]
struct ConfigModel {
    #[serde(rename = "mongoConnectionString", default)]
    connection_string: String,
}

/// Decoded settings of one datasource instance
#[derive(Clone, PartialEq, Eq)]
pub struct DatasourceSettings {
    /// Connection string from `jsonData.mongoConnectionString`
    pub connection_string: String,

    /// Decrypted password, empty when none is stored
    pub password: String,

    /// Decrypted TLS client certificate, empty when none is stored
    pub ssl_client_cert: String,
}

impl DatasourceSettings {
    /// Decode settings from the `jsonData` bytes and decrypted secure fields
    pub fn from_instance(json_data: &[u8], decrypted: &HashMap<String, String>) -> Result<Self> {
        let model: ConfigModel = serde_json::from_slice(json_data).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode datasource jsonData");
            DocQueryError::config_error(format!("wrong configuration: {e}"))
        })?;

        let secret =
            |field: SecretField| decrypted.get(field.as_str()).cloned().unwrap_or_default();
        let settings = Self {
            connection_string: model.connection_string,
            password: secret(SecretField::Password),
            ssl_client_cert: secret(SecretField::SslClientCert),
        };
        tracing::debug!(
            has_password = settings.has_password(),
            has_client_cert = settings.has_client_cert(),
            "decoded datasource settings"
        );
        Ok(settings)
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    #[must_use]
    pub fn has_client_cert(&self) -> bool {
        !self.ssl_client_cert.is_empty()
    }
}

// WARNING: Sensitive data, the connection string may embed credentials too
impl std::fmt::Debug for DatasourceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceSettings")
            .field("connection_string", &"<redacted>")
            .field("has_password", &self.has_password())
            .field("has_client_cert", &self.has_client_cert())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_settings_with_secrets() {
        let mut decrypted = HashMap::new();
        decrypted.insert("password".to_string(), "pw".to_string());

        let settings = DatasourceSettings::from_instance(
            br#"{"mongoConnectionString": "mongodb://db:27017"}"#,
            &decrypted,
        )
        .unwrap();

        assert_eq!(settings.connection_string, "mongodb://db:27017");
        assert_eq!(settings.password, "pw");
        assert_eq!(settings.ssl_client_cert, "");
        assert!(settings.has_password());
        assert!(!settings.has_client_cert());
    }

    #[test]
    fn test_malformed_json_data_is_wrong_configuration() {
        let err = DatasourceSettings::from_instance(b"not json", &HashMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.message().contains("wrong configuration"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut decrypted = HashMap::new();
        decrypted.insert("sslClientCert".to_string(), "-----BEGIN CERTIFICATE-----".to_string());
        let settings = DatasourceSettings::from_instance(
            br#"{"mongoConnectionString": "mongodb://user:pw@db"}"#,
            &decrypted,
        )
        .unwrap();

        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("BEGIN CERTIFICATE"));
        assert!(!rendered.contains("user:pw"));
        assert!(rendered.contains("has_client_cert: true"));
    }
}
