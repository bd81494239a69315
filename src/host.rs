//! Host Capability Traits
//!
//! The dashboarding host owns both records and the execution pipeline. Editors receive the
//! host callbacks as an explicit capability at construction instead of reaching for ambient
//! globals, so any host (a real plugin bridge, the CLI, a test) can be substituted.
//!
//! # Callbacks
//! - [`OptionsHost::on_options_change`] - a new configuration record replaces the old one
//! - [`QueryHost::on_change`] - a new query record replaces the old one
//! - [`QueryHost::on_run_query`] - execute whatever query record the host currently holds
//!
//! Execution requests are fire-and-forget: editors never observe completion or results.

use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::query::QuerySpec;

/// Host side of the configuration form
pub trait OptionsHost {
    /// Replace the configuration record; the host persists it and re-renders
    fn on_options_change(&mut self, updated: ConnectionConfig);
}

/// Host side of the query form
pub trait QueryHost {
    /// Replace the live query record
    fn on_change(&mut self, updated: QuerySpec);

    /// Request execution of the query record most recently passed to [`Self::on_change`]
    fn on_run_query(&mut self);
}

impl<H: OptionsHost + ?Sized> OptionsHost for &mut H {
    fn on_options_change(&mut self, updated: ConnectionConfig) {
        (**self).on_options_change(updated);
    }
}

impl<H: QueryHost + ?Sized> QueryHost for &mut H {
    fn on_change(&mut self, updated: QuerySpec) {
        (**self).on_change(updated);
    }

    fn on_run_query(&mut self) {
        (**self).on_run_query();
    }
}

/// One recorded host callback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "record", rename_all = "snake_case")]
pub enum HostEvent {
    /// `on_options_change` was called with this record
    OptionsChanged(ConnectionConfig),
    /// `on_change` was called with this record
    QueryChanged(QuerySpec),
    /// `on_run_query` was called
    RunQuery,
}

/// Host that records every callback in call order
///
/// Used by tests to assert on the exact callback sequence, and by the CLI to report what a
/// real host would have received.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
}

impl RecordingHost {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded callbacks, oldest first
    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Drain the recorded callbacks
    pub fn take(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of `on_run_query` calls
    #[must_use]
    pub fn run_requests(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, HostEvent::RunQuery)).count()
    }

    /// Most recent query record passed to `on_change`
    #[must_use]
    pub fn last_query(&self) -> Option<&QuerySpec> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::QueryChanged(query) => Some(query),
            _ => None,
        })
    }

    /// Most recent configuration record passed to `on_options_change`
    #[must_use]
    pub fn last_options(&self) -> Option<&ConnectionConfig> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::OptionsChanged(options) => Some(options),
            _ => None,
        })
    }
}

impl OptionsHost for RecordingHost {
    fn on_options_change(&mut self, updated: ConnectionConfig) {
        self.events.push(HostEvent::OptionsChanged(updated));
    }
}

impl QueryHost for RecordingHost {
    fn on_change(&mut self, updated: QuerySpec) {
        self.events.push(HostEvent::QueryChanged(updated));
    }

    fn on_run_query(&mut self) {
        self.events.push(HostEvent::RunQuery);
    }
}
