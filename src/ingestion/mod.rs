//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] (from [`unified`]) which:
//!
//! - auto-detects the source type from the file extension
//! - validates and loads the file via the matching handler
//! - folds the outcome into the caller's [`crate::state::SessionState`]
//! - optionally reports success/failure/alerts to an [`IngestObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`sqlite`]
//! - [`json`]

use std::path::Path;

pub mod csv;
mod infer;
pub mod json;
pub mod observability;
pub mod sqlite;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestContext, IngestObserver, IngestStats, Severity,
    StdErrObserver,
};
pub use unified::{
    FormatHandler, IngestOptions, IngestRequest, SourceType, handler_for, ingest,
    ingest_with_options,
};

/// Case-insensitive extension check shared by the handlers.
pub(crate) fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            allowed.iter().any(|a| *a == ext)
        })
        .unwrap_or(false)
}
