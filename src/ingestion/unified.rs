//! Source detection and the session dispatcher.
//!
//! [`ingest`] is the main entrypoint: it detects the source type from the path, runs the matching
//! handler's validate/load, and folds the outcome into the caller's
//! [`crate::state::SessionState`]. Failures never cross the boundary as errors; they land in the
//! state's `error` field with a stage prefix (`"... validation failed"` / `"... processing
//! failed"`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{IngestError, IngestResult};
use crate::state::{IngestStatus, SessionState};
use crate::types::{DataTable, Schema};

use super::observability::{IngestContext, IngestObserver, IngestStats, Severity};
use super::{csv, json, sqlite};

/// Supported source formats, as detected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Comma-separated values (`.csv`).
    Csv,
    /// SQLite database file (`.db`, `.sqlite`, `.sqlite3`).
    Sqlite,
    /// JSON text (`.json`, `.jsonl`).
    Json,
    /// Anything else. No handler exists for this variant.
    Unknown,
}

impl SourceType {
    /// Detect the source type from a path's extension, case-insensitively.
    ///
    /// Pure function: no I/O, never fails. Paths without an extension are [`Self::Unknown`].
    pub fn detect(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Self::Csv,
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            Some("json" | "jsonl") => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label used in error-message prefixes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Sqlite => "SQLite",
            Self::Json => "JSON",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Csv => "csv",
            Self::Sqlite => "sqlite",
            Self::Json => "json",
            Self::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

/// The fixed interface every format handler implements.
///
/// Handlers are stateless; [`handler_for`] is the registry keyed by [`SourceType`].
pub trait FormatHandler: Send + Sync {
    /// Check the file before loading. Failure reasons are human-readable.
    fn validate(&self, path: &Path) -> IngestResult<()>;

    /// Load the file into a table plus schema descriptor.
    fn load(&self, path: &Path) -> IngestResult<(DataTable, Schema)>;

    /// Generate a dataset id for this source. Best-effort unique, not guaranteed.
    fn generate_id(&self, path: &Path) -> String;
}

struct CsvHandler;
struct SqliteHandler;
struct JsonHandler;

impl FormatHandler for CsvHandler {
    fn validate(&self, path: &Path) -> IngestResult<()> {
        csv::validate_csv(path)
    }

    fn load(&self, path: &Path) -> IngestResult<(DataTable, Schema)> {
        csv::load_csv(path)
    }

    fn generate_id(&self, path: &Path) -> String {
        dataset_id("csv", path)
    }
}

impl FormatHandler for SqliteHandler {
    fn validate(&self, path: &Path) -> IngestResult<()> {
        sqlite::validate_sqlite(path)
    }

    fn load(&self, path: &Path) -> IngestResult<(DataTable, Schema)> {
        sqlite::load_sqlite(path)
    }

    fn generate_id(&self, path: &Path) -> String {
        dataset_id("sqlite", path)
    }
}

impl FormatHandler for JsonHandler {
    fn validate(&self, path: &Path) -> IngestResult<()> {
        json::validate_json(path)
    }

    fn load(&self, path: &Path) -> IngestResult<(DataTable, Schema)> {
        json::load_json(path)
    }

    fn generate_id(&self, path: &Path) -> String {
        dataset_id("json", path)
    }
}

/// Registry mapping a detected source type to its handler. [`SourceType::Unknown`] has none.
pub fn handler_for(source: SourceType) -> Option<&'static dyn FormatHandler> {
    match source {
        SourceType::Csv => Some(&CsvHandler),
        SourceType::Sqlite => Some(&SqliteHandler),
        SourceType::Json => Some(&JsonHandler),
        SourceType::Unknown => None,
    }
}

/// `{prefix}_{file stem}_{random token}`. The token keeps ids distinguishable across repeated
/// ingestions of the same file within a session; uniqueness is best-effort.
fn dataset_id(prefix: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    format!("{prefix}_{stem}_{:08x}", rand::random::<u32>())
}

/// Options controlling dispatch behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestOptions {
    /// If `None`, auto-detect the source type from the file extension.
    pub source: Option<SourceType>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            source: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("source", &self.source)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Ingest a file into the session state with default options.
///
/// Takes the state by value and returns the updated value; the caller owns it before and after.
/// See [`ingest_with_options`] for the full contract.
pub fn ingest(path: impl AsRef<Path>, state: SessionState) -> SessionState {
    ingest_with_options(path, state, &IngestOptions::default())
}

/// Ingest a file into the session state.
///
/// 1. Sets `status = Processing`.
/// 2. Detects the source type (or takes `options.source`); unknown types fail immediately with
///    `"Unsupported file type: {path}"` and no handler runs.
/// 3. Runs the handler's `validate`; failures land as `"{Format} validation failed: {reason}"`.
/// 4. Runs the handler's `load`; failures land as `"{Format} processing failed: {reason}"`.
/// 5. On success, writes `source_type`, `dataset_id`, `table`, `schema`, and
///    `status = Completed` as one update.
///
/// Never panics and never returns an error: every failure is folded into the state. When an
/// observer is configured it sees every outcome, and `on_alert` additionally fires for failures
/// whose severity is at or above `options.alert_at_or_above`.
pub fn ingest_with_options(
    path: impl AsRef<Path>,
    mut state: SessionState,
    options: &IngestOptions,
) -> SessionState {
    let path = path.as_ref();
    state.status = IngestStatus::Processing;

    let source = options.source.unwrap_or_else(|| SourceType::detect(path));
    let ctx = IngestContext {
        path: path.to_path_buf(),
        source,
    };

    let Some(handler) = handler_for(source) else {
        let message = format!("Unsupported file type: {}", path.display());
        notify_failure(options, &ctx, &IngestError::validation(message.clone()));
        state.fail(message);
        return state;
    };

    if let Err(e) = handler.validate(path) {
        notify_failure(options, &ctx, &e);
        state.fail(format!("{} validation failed: {e}", source.label()));
        return state;
    }

    match handler.load(path) {
        Ok((table, schema)) => {
            let stats = IngestStats {
                rows: table.row_count(),
                columns: table.column_count(),
            };
            state.complete(source, handler.generate_id(path), table, schema);
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&ctx, stats);
            }
        }
        Err(e) => {
            notify_failure(options, &ctx, &e);
            state.fail(format!("{} processing failed: {e}", source.label()));
        }
    }

    state
}

fn notify_failure(options: &IngestOptions, ctx: &IngestContext, error: &IngestError) {
    if let Some(obs) = options.observer.as_ref() {
        let severity = severity_for_error(error);
        obs.on_failure(ctx, severity, error);
        if severity >= options.alert_at_or_above {
            obs.on_alert(ctx, severity, error);
        }
    }
}

fn severity_for_error(e: &IngestError) -> Severity {
    match e {
        IngestError::Io(_) => Severity::Critical,
        IngestError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        IngestError::Json(err) => {
            if err.is_io() {
                Severity::Critical
            } else {
                Severity::Error
            }
        }
        IngestError::Sqlite(_) => Severity::Error,
        IngestError::Validation { .. } => Severity::Error,
        IngestError::Malformed { .. } => Severity::Error,
    }
}

/// Convenience helper for callers that want an owned job object.
///
/// Useful when ingestion work is enqueued for later execution.
#[derive(Clone)]
pub struct IngestRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling dispatch.
    pub options: IngestOptions,
}

impl fmt::Debug for IngestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestRequest {
    /// Execute the request by calling [`ingest_with_options`].
    pub fn run(&self, state: SessionState) -> SessionState {
        ingest_with_options(&self.path, state, &self.options)
    }
}
