//! Session state: the accumulator every ingestion call folds its outcome into.
//!
//! State is owned and explicitly passed: [`crate::ingestion::ingest`] takes a [`SessionState`] by
//! value and returns the updated value. There are no globals and no persistence; the state lives
//! as long as the caller keeps it.

use serde::Serialize;

use crate::ingestion::SourceType;
use crate::types::{DataTable, Schema};

/// Lifecycle status of the current session's ingestion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// Fresh state, nothing ingested yet.
    Initialized,
    /// An ingestion call is in flight.
    Processing,
    /// The last ingestion succeeded; `table` and `schema` are set.
    Completed,
    /// The last ingestion failed; `error` is set.
    Error,
}

impl std::fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Initialized => "initialized",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        f.write_str(tag)
    }
}

/// Mutable session state holding the current ingestion outcome.
///
/// Invariants maintained by the dispatcher:
///
/// - `status == Completed` implies `table`, `schema`, and `dataset_id` are set and `error` is not.
/// - `status == Error` implies `error` is set and `table`/`schema`/`dataset_id` are not.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    /// Current lifecycle status.
    pub status: IngestStatus,
    /// Source format of the last successful ingestion.
    pub source_type: Option<SourceType>,
    /// Generated label for the last successful ingestion.
    pub dataset_id: Option<String>,
    /// The loaded table. Owned exclusively by the state once assigned.
    pub table: Option<DataTable>,
    /// Flat schema descriptor for `table`.
    pub schema: Option<Schema>,
    /// Failure message from the last ingestion, if it failed.
    pub error: Option<String>,
}

impl SessionState {
    /// Create a fresh state with all-empty fields and [`IngestStatus::Initialized`].
    pub fn new() -> Self {
        Self {
            status: IngestStatus::Initialized,
            source_type: None,
            dataset_id: None,
            table: None,
            schema: None,
            error: None,
        }
    }

    /// One-line human-readable summary of the current state.
    pub fn status_summary(&self) -> String {
        if let Some(err) = &self.error {
            return format!("Error: {err}");
        }

        let mut parts = vec![format!("Status: {}", self.status)];
        if let Some(source) = self.source_type {
            parts.push(format!("Source: {source}"));
        }
        if let Some(id) = &self.dataset_id {
            parts.push(format!("Dataset: {id}"));
        }
        if let Some(table) = &self.table {
            parts.push(format!("Data: {} rows", table.row_count()));
        }
        parts.join(" | ")
    }

    /// Record a successful ingestion: the full triple plus source type, in one update.
    pub(crate) fn complete(
        &mut self,
        source_type: SourceType,
        dataset_id: String,
        table: DataTable,
        schema: Schema,
    ) {
        self.status = IngestStatus::Completed;
        self.source_type = Some(source_type);
        self.dataset_id = Some(dataset_id);
        self.table = Some(table);
        self.schema = Some(schema);
        self.error = None;
    }

    /// Record a failed ingestion. Clears any previously loaded data.
    pub(crate) fn fail(&mut self, message: String) {
        self.status = IngestStatus::Error;
        self.source_type = None;
        self.dataset_id = None;
        self.table = None;
        self.schema = None;
        self.error = Some(message);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
