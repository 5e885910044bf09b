//! `session-ingest` is a small library for ingesting CSV, SQLite, and JSON files into an
//! in-memory [`types::DataTable`] with an inferred flat [`types::Schema`], recording each outcome
//! in an owned [`state::SessionState`].
//!
//! The primary entrypoint is [`ingestion::ingest`], which auto-detects the source type from the
//! file extension, validates the file, loads a bounded amount of data, and returns the updated
//! session state. Failures never propagate as errors or panics; they land in the state's `error`
//! field with a stage prefix.
//!
//! ## What you can ingest
//!
//! **Source formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv` — header-named columns, at most 10,000 rows, 100 MiB file-size cap
//! - **SQLite**: `.db`, `.sqlite`, `.sqlite3` — at most 3 user tables, 1,000 rows each, combined
//!   side by side with `{table}_{column}` names
//! - **JSON**: `.json`, `.jsonl` — one object or an array of objects, at most 1,000 documents
//!
//! **Inferred column types:**
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Datetime`]
//!
//! Across formats, empty cells / absent keys / explicit nulls map to [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```no_run
//! use session_ingest::ingestion::ingest;
//! use session_ingest::state::{IngestStatus, SessionState};
//!
//! let state = ingest("data/sales.csv", SessionState::new());
//! match state.status {
//!     IngestStatus::Completed => {
//!         let schema = state.schema.as_ref().unwrap();
//!         println!("loaded {} rows, {} columns", schema.row_count, schema.column_count);
//!     }
//!     _ => eprintln!("{}", state.status_summary()),
//! }
//! ```
//!
//! ## Observability
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use session_ingest::ingestion::{ingest_with_options, IngestOptions, Severity, StdErrObserver};
//! use session_ingest::state::SessionState;
//!
//! let opts = IngestOptions {
//!     observer: Some(Arc::new(StdErrObserver)),
//!     alert_at_or_above: Severity::Error,
//!     ..Default::default()
//! };
//!
//! // Validation failures are Error-severity and trigger `on_alert` at this threshold.
//! let state = ingest_with_options("does_not_exist.csv", SessionState::new(), &opts);
//! assert!(state.error.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: source detection, dispatch, and format-specific implementations
//! - [`state`]: the owned session-state accumulator
//! - [`types`]: table + schema types
//! - [`error`]: error types used across ingestion

pub mod error;
pub mod ingestion;
pub mod state;
pub mod types;

pub use error::{IngestError, IngestResult};
pub use ingestion::{SourceType, ingest, ingest_with_options};
pub use state::{IngestStatus, SessionState};
