//! docquery - Query and Connection Editors for a Document-Database Datasource
//!
//! docquery models the two forms a dashboard host shows for a document-database datasource:
//! a configuration form (connection string plus secrets) and a query form (database,
//! collection, JSON aggregation expression). The host owns both records, persists them and
//! executes queries; this crate decides what the host is told and when.
//!
//! # Core Principles
//! - Records are replaced whole on every edit, never patched in place
//! - Query text is checked by a pure well-formedness gate before execution is requested
//! - Malformed query text is normal input, never an error
//! - Host callbacks are an explicit capability, never ambient globals
//!
//! # Module Organization
//! - [`query`] - Query record, well-formedness gate, query form, backend decoding
//! - [`config`] - Configuration record, configuration form, backend settings decoding
//! - [`host`] - Host capability traits and a recording host
//! - [`error`] - Error types and handling
//! - [`output`] - JSON output envelope types
//! - [`logging`] - Subscriber setup for the CLI

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod output;
pub mod query;

// Re-export commonly used types for convenience
pub use config::editor::ConfigEditor;
pub use config::settings::DatasourceSettings;
pub use config::{ConnectionConfig, SecretField};
pub use error::{DocQueryError, Result};
pub use host::{HostEvent, OptionsHost, QueryHost, RecordingHost};
pub use output::{ErrorEnvelope, ErrorInfo, Metadata, SuccessEnvelope};
pub use query::editor::QueryEditor;
pub use query::gate::{
    is_well_formed, normalize, QueryIndicator, QueryTextState, INVALID_QUERY_MESSAGE,
};
pub use query::model::QueryModel;
pub use query::QuerySpec;
