use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by validation and load functions.
///
/// This is a single error enum shared across CSV/SQLite/JSON ingestion. The dispatcher never lets
/// it escape: every failure is folded into [`crate::state::SessionState`]'s `error` field.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying I/O error (e.g. permission denied, read failure mid-load).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error (malformed delimited text).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite engine error (bad database file, failed query).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file failed a pre-load check (missing, wrong extension, empty, oversized, no tables).
    #[error("{message}")]
    Validation { message: String },

    /// The file parsed but its shape is unusable (e.g. a JSON array element that is not an object).
    #[error("{message}")]
    Malformed { message: String },
}

impl IngestError {
    /// Build a validation error from a human-readable reason.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a malformed-input error from a human-readable reason.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
