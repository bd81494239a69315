//! docquery CLI Entry Point
//!
//! The CLI stands in for the dashboard host so the editor contract can be driven from a shell.
//! It provides four subcommands:
//! - `check` - Run query text through the well-formedness gate
//! - `replay` - Replay an edit script through the query form and report host callbacks
//! - `configure` - Apply edits to a datasource configuration record
//! - `default-query` - Print the query record used when there is no prior value
//!
//! All output to stdout is JSON-only. Logs and prompts go to stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use docquery::config::editor::{CONNECTION_STRING_LABEL, CONNECTION_STRING_PLACEHOLDER};
use docquery::{
    is_well_formed, logging, normalize, ConfigEditor, ConnectionConfig, DocQueryError,
    ErrorEnvelope, ErrorInfo, Metadata, QueryEditor, QueryIndicator, QuerySpec, QueryTextState,
    RecordingHost, Result, SecretField, SuccessEnvelope,
};

/// docquery - query and connection editors for a document-database datasource
#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "Query and connection editor models for a document-database datasource")]
#[command(version)]
struct Cli {
    /// Log editor decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check query text against the well-formedness gate
    Check {
        /// Query text (read from --file or stdin when omitted)
        text: Option<String>,

        /// Read query text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Replay an edit script (`db=`, `collection=`, `query=` lines) through the query form
    Replay {
        /// Read the script from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Starting query record as JSON (the default query when omitted)
        #[arg(long)]
        initial: Option<String>,
    },

    /// Apply edits to a datasource configuration record
    Configure {
        /// Current record as JSON file (an empty record when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// New connection string
        #[arg(long)]
        connection_string: Option<String>,

        /// New password
        #[arg(long)]
        password: Option<String>,

        /// Read a new client certificate bundle from a PEM file
        #[arg(long)]
        ssl_client_cert_file: Option<PathBuf>,

        /// Reset the stored password
        #[arg(long)]
        reset_password: bool,

        /// Reset the stored client certificate
        #[arg(long)]
        reset_ssl_client_cert: bool,

        /// Prompt for each field
        #[arg(long)]
        interactive: bool,
    },

    /// Print the query record used when there is no prior value
    DefaultQuery,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Check { .. } => "check",
            Self::Replay { .. } => "replay",
            Self::Configure { .. } => "configure",
            Self::DefaultQuery => "default-query",
        }
    }
}

/// Command output before it is wrapped in an envelope
struct Report {
    data: Value,
    events_recorded: Option<usize>,
}

impl Report {
    fn new(data: impl Serialize) -> Result<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| DocQueryError::invalid_input(format!("could not serialize output: {e}")))?;
        Ok(Self {
            data,
            events_recorded: None,
        })
    }

    fn with_events(mut self, count: usize) -> Self {
        self.events_recorded = Some(count);
        self
    }
}

#[derive(Serialize)]
struct CheckReport {
    well_formed: bool,
    state: QueryTextState,
    indicator: QueryIndicator,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
}

#[derive(Serialize)]
struct ReplayReport {
    events: Vec<docquery::HostEvent>,
    run_requests: usize,
    query: QuerySpec,
    indicator: QueryIndicator,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut stdout = std::io::stdout().lock();

    let Some(command) = cli.command else {
        let envelope = ErrorEnvelope::new(
            "",
            ErrorInfo::new(
                "NO_SUBCOMMAND",
                "No subcommand provided. Use --help to see available commands.",
            ),
        );
        serde_json::to_writer(&mut stdout, &envelope).context("failed to write output")?;
        writeln!(stdout)?;
        std::process::exit(1);
    };

    let name = command.name();
    let started = Instant::now();

    match run(command) {
        Ok(report) => {
            let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let meta = match report.events_recorded {
                Some(count) => Metadata::with_events(elapsed, count),
                None => Metadata::new(elapsed),
            };
            let envelope = SuccessEnvelope::new(name, report.data, meta);
            serde_json::to_writer(&mut stdout, &envelope).context("failed to write output")?;
            writeln!(stdout)?;
            Ok(())
        }
        Err(err) => {
            tracing::debug!(code = err.error_code(), "command failed");
            let envelope = ErrorEnvelope::from_error(name, &err);
            serde_json::to_writer(&mut stdout, &envelope).context("failed to write output")?;
            writeln!(stdout)?;
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<Report> {
    match command {
        Commands::Check { text, file } => {
            let text = match text {
                Some(text) => text,
                None => read_input(file.as_deref())?,
            };
            check(&text)
        }
        Commands::Replay { file, initial } => {
            let script = read_input(file.as_deref())?;
            let initial = initial
                .map(|json| {
                    serde_json::from_str::<QuerySpec>(&json).map_err(|e| {
                        DocQueryError::invalid_input(format!("invalid --initial record: {e}"))
                    })
                })
                .transpose()?;
            replay(&script, initial)
        }
        Commands::Configure {
            input,
            connection_string,
            password,
            ssl_client_cert_file,
            reset_password,
            reset_ssl_client_cert,
            interactive,
        } => {
            let options = match input {
                Some(path) => {
                    let contents = std::fs::read_to_string(&path)?;
                    serde_json::from_str::<ConnectionConfig>(&contents).map_err(|e| {
                        DocQueryError::invalid_input(format!("invalid configuration record: {e}"))
                    })?
                }
                None => ConnectionConfig::default(),
            };
            let mut editor = ConfigEditor::new(RecordingHost::new(), options);

            if let Some(value) = connection_string {
                editor.on_connection_string_change(value);
            }
            if let Some(value) = password {
                editor.on_password_change(value);
            }
            if let Some(path) = ssl_client_cert_file {
                editor.on_ssl_client_cert_change(std::fs::read_to_string(path)?);
            }
            if reset_password {
                editor.on_password_reset();
            }
            if reset_ssl_client_cert {
                editor.on_ssl_client_cert_reset();
            }
            if interactive {
                prompt_configuration(&mut editor)?;
            }

            let events = editor.host().events().len();
            Ok(Report::new(editor.options())?.with_events(events))
        }
        Commands::DefaultQuery => Report::new(QuerySpec::default()),
    }
}

fn check(text: &str) -> Result<Report> {
    Report::new(CheckReport {
        well_formed: is_well_formed(text),
        state: QueryTextState::of(text),
        indicator: QueryIndicator::for_text(text),
        normalized: normalize(text),
    })
}

/// Edit applied by one line of a replay script
#[derive(Debug, PartialEq, Eq)]
enum Edit<'a> {
    Db(&'a str),
    Collection(&'a str),
    QueryText(&'a str),
}

/// Parse `field=value` lines; blank lines and `#` comments are skipped
fn parse_script(script: &str) -> Result<Vec<Edit<'_>>> {
    let mut edits = Vec::new();
    for (index, line) in script.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let (field, value) = line.split_once('=').ok_or_else(|| {
            DocQueryError::invalid_input(format!("line {}: expected field=value", index + 1))
        })?;
        let edit = match field.trim() {
            "db" => Edit::Db(value),
            "collection" => Edit::Collection(value),
            "query" | "queryText" => Edit::QueryText(value),
            other => {
                return Err(DocQueryError::invalid_input(format!(
                    "line {}: unknown edit field '{other}'",
                    index + 1
                )))
            }
        };
        edits.push(edit);
    }
    Ok(edits)
}

fn replay(script: &str, initial: Option<QuerySpec>) -> Result<Report> {
    let edits = parse_script(script)?;
    let mut editor = QueryEditor::new(RecordingHost::new(), initial);

    for edit in edits {
        match edit {
            Edit::Db(value) => editor.on_db_change(value),
            Edit::Collection(value) => editor.on_collection_change(value),
            Edit::QueryText(value) => {
                editor.on_query_text_change(value);
            }
        }
    }

    let indicator = editor.indicator();
    let query = editor.query().clone();
    let mut host = editor.into_host();
    let run_requests = host.run_requests();
    let events = host.take();
    let count = events.len();

    let report = ReplayReport {
        events,
        run_requests,
        query,
        indicator,
    };
    Ok(Report::new(report)?.with_events(count))
}

fn prompt_configuration(editor: &mut ConfigEditor<RecordingHost>) -> Result<()> {
    let prompt_err = |e: dialoguer::Error| DocQueryError::io_error(format!("prompt failed: {e}"));

    let connection_string: String = dialoguer::Input::new()
        .with_prompt(format!("{CONNECTION_STRING_LABEL} [{CONNECTION_STRING_PLACEHOLDER}]"))
        .with_initial_text(editor.connection_string())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    if connection_string != editor.connection_string() {
        editor.on_connection_string_change(connection_string);
    }

    for field in SecretField::ALL {
        if editor.is_configured(field) {
            let reset = dialoguer::Confirm::new()
                .with_prompt(format!("{} is configured. Reset it?", field.label()))
                .default(false)
                .interact()
                .map_err(prompt_err)?;
            if !reset {
                continue;
            }
            editor.on_secret_reset(field);
        }

        let value = match field {
            SecretField::Password => dialoguer::Password::new()
                .with_prompt(format!("{} [{}] (empty to skip)", field.label(), field.placeholder()))
                .allow_empty_password(true)
                .interact()
                .map_err(prompt_err)?,
            SecretField::SslClientCert => {
                let path: String = dialoguer::Input::new()
                    .with_prompt(format!("{} PEM file (empty to skip)", field.label()))
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?;
                if path.trim().is_empty() {
                    String::new()
                } else {
                    read_input(Some(Path::new(path.trim())))?
                }
            }
        };
        if !value.is_empty() {
            editor.on_secret_change(field, value);
        }
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = "# start\ndb=admin\n\ncollection=logs\nquery=[{$limit: 1}]\n";
        let edits = parse_script(script).unwrap();
        assert_eq!(
            edits,
            vec![
                Edit::Db("admin"),
                Edit::Collection("logs"),
                Edit::QueryText("[{$limit: 1}]")
            ]
        );
    }

    #[test]
    fn test_parse_script_keeps_equals_in_value() {
        let edits = parse_script("query={\"a\": \"x=y\"}").unwrap();
        assert_eq!(edits, vec![Edit::QueryText("{\"a\": \"x=y\"}")]);
    }

    #[test]
    fn test_parse_script_rejects_unknown_field() {
        let err = parse_script("host=db").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.message().contains("line 1"));
    }

    #[test]
    fn test_replay_counts_runs() {
        let report = replay("query=[{\ncollection=logs\nquery=[]\n", None).unwrap();
        assert_eq!(report.data["run_requests"], 2);
        assert_eq!(report.data["query"]["collection"], "logs");
        assert_eq!(report.data["indicator"]["invalid"], false);
        assert_eq!(report.events_recorded, Some(5));
    }

    #[test]
    fn test_check_report() {
        let report = check("").unwrap();
        assert_eq!(report.data["well_formed"], false);
        assert_eq!(report.data["state"], "empty");
        assert_eq!(report.data["indicator"]["invalid"], false);
    }
}
