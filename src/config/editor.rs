//! Configuration Form
//!
//! Every edit emits one whole replacement record to the host, built as a shallow copy of the
//! current record that overrides exactly the changed field.
//!
//! # Secret reset
//! Resetting a secret clears its stored value and its configured flag in the same emitted
//! record. A host never observes the flag cleared while the value is still present, or the
//! reverse.
//!
//! # Secret edit
//! Editing a secret only sets `secureJsonData`; the configured flag is left as the host
//! reported it.

use crate::config::{ConnectionConfig, JsonData, SecretField, SecureJsonData};
use crate::host::OptionsHost;

/// Label of the connection string field
pub const CONNECTION_STRING_LABEL: &str = "Connection String";

/// Placeholder of the connection string field
pub const CONNECTION_STRING_PLACEHOLDER: &str =
    "mongodb://username@host:port/?directConnection=true";

/// Configuration form bound to a host
#[derive(Debug)]
pub struct ConfigEditor<H> {
    host: H,
    options: ConnectionConfig,
}

impl<H: OptionsHost> ConfigEditor<H> {
    /// Create an editor for the record the host currently holds
    pub fn new(host: H, options: ConnectionConfig) -> Self {
        Self { host, options }
    }

    /// Current record as last rendered
    #[must_use]
    pub fn options(&self) -> &ConnectionConfig {
        &self.options
    }

    /// Host re-rendered the editor with a new record
    pub fn set_options(&mut self, options: ConnectionConfig) {
        self.options = options;
    }

    /// Borrow the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// Connection string as displayed (empty when unset)
    #[must_use]
    pub fn connection_string(&self) -> &str {
        self.options.connection_string()
    }

    /// Whether `field` shows as configured
    #[must_use]
    pub fn is_configured(&self, field: SecretField) -> bool {
        self.options.is_configured(field)
    }

    /// Secret as displayed (empty when untouched)
    #[must_use]
    pub fn secret_value(&self, field: SecretField) -> &str {
        self.options.secret_value(field)
    }

    /// The connection string field changed
    pub fn on_connection_string_change(&mut self, value: impl Into<String>) {
        let json_data = JsonData {
            mongo_connection_string: value.into(),
            ..self.options.json_data.clone()
        };
        tracing::debug!("connection string edited");
        self.replace(ConnectionConfig {
            json_data,
            ..self.options.clone()
        });
    }

    /// The password field changed
    pub fn on_password_change(&mut self, value: impl Into<String>) {
        self.on_secret_change(SecretField::Password, value.into());
    }

    /// The password reset button was pressed
    pub fn on_password_reset(&mut self) {
        self.on_secret_reset(SecretField::Password);
    }

    /// The client certificate field changed
    pub fn on_ssl_client_cert_change(&mut self, value: impl Into<String>) {
        self.on_secret_change(SecretField::SslClientCert, value.into());
    }

    /// The client certificate reset button was pressed
    pub fn on_ssl_client_cert_reset(&mut self) {
        self.on_secret_reset(SecretField::SslClientCert);
    }

    /// A secret field changed
    pub fn on_secret_change(&mut self, field: SecretField, value: String) {
        // WARNING: never log the value
        tracing::debug!(%field, "secret edited");
        let secure_json_data = self.secure_json_data().with(field, value);
        self.replace(ConnectionConfig {
            secure_json_data: Some(secure_json_data),
            ..self.options.clone()
        });
    }

    /// A secret reset button was pressed
    pub fn on_secret_reset(&mut self, field: SecretField) {
        tracing::debug!(%field, "secret reset");
        let secure_json_fields = self.options.secure_json_fields.with(field, false);
        let secure_json_data = self.secure_json_data().with(field, String::new());
        self.replace(ConnectionConfig {
            secure_json_fields,
            secure_json_data: Some(secure_json_data),
            ..self.options.clone()
        });
    }

    fn secure_json_data(&self) -> SecureJsonData {
        self.options.secure_json_data.clone().unwrap_or_default()
    }

    fn replace(&mut self, next: ConnectionConfig) {
        self.host.on_options_change(next.clone());
        self.options = next;
    }
}
