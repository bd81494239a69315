//! Query Form
//!
//! Binds db, collection and query text to the host's query record and applies the
//! execution-trigger policy:
//! - db and collection edits always request execution after the record update
//! - query text edits always update the record, and request execution only when the gate
//!   accepts the new text
//!
//! The record update is always issued before the execution decision, and is issued even when
//! execution is suppressed, so keystrokes are never lost.

use crate::host::QueryHost;
use crate::query::gate::{is_well_formed, QueryIndicator, QueryTextState};
use crate::query::QuerySpec;

/// Query form bound to a host
#[derive(Debug)]
pub struct QueryEditor<H> {
    host: H,
    query: QuerySpec,
}

impl<H: QueryHost> QueryEditor<H> {
    /// Create an editor for `query`, or for the default query when there is no prior value
    pub fn new(host: H, query: Option<QuerySpec>) -> Self {
        let query = query.unwrap_or_default();
        tracing::debug!(db = %query.db, collection = %query.collection, "query editor opened");
        Self { host, query }
    }

    /// Current query record as last rendered
    #[must_use]
    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// Host re-rendered the editor with a new record
    pub fn set_query(&mut self, query: QuerySpec) {
        self.query = query;
    }

    /// Validity indicator for the current query text
    #[must_use]
    pub fn indicator(&self) -> QueryIndicator {
        QueryIndicator::for_text(&self.query.query_text)
    }

    /// Validity state of the current query text
    #[must_use]
    pub fn text_state(&self) -> QueryTextState {
        QueryTextState::of(&self.query.query_text)
    }

    /// Borrow the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// The db field changed
    pub fn on_db_change(&mut self, value: impl Into<String>) {
        let next = self.query.with_db(value);
        tracing::debug!(db = %next.db, "db edited");
        self.replace(next);
        self.host.on_run_query();
    }

    /// The collection field changed
    pub fn on_collection_change(&mut self, value: impl Into<String>) {
        let next = self.query.with_collection(value);
        tracing::debug!(collection = %next.collection, "collection edited");
        self.replace(next);
        self.host.on_run_query();
    }

    /// The query text changed
    ///
    /// Returns whether execution was requested.
    pub fn on_query_text_change(&mut self, value: impl Into<String>) -> bool {
        let next = self.query.with_query_text(value);
        let run = is_well_formed(&next.query_text);
        tracing::debug!(len = next.query_text.len(), well_formed = run, "query text edited");
        self.replace(next);
        if run {
            self.host.on_run_query();
        }
        run
    }

    fn replace(&mut self, next: QuerySpec) {
        self.host.on_change(next.clone());
        self.query = next;
    }
}
