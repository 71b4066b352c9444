use thiserror::Error;

use crate::source::SourceError;

/// Errors raised by the citation database and record construction
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("publication {0} already exists in the database")]
    DuplicateIdentifier(String),
    #[error("no cited-by handle or bibliography URL for \"{title}\"")]
    IdentifierUnavailable { title: String },
    #[error("search provider error: {0}")]
    Source(#[from] SourceError),
    #[error("unsupported database file: {0}")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
