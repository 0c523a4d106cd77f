use std::path::PathBuf;

use arrow::error::ArrowError;
use thiserror::Error;

/// Errors raised by the ingestion pipeline, one variant per failure kind.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("source unreadable: {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("schema mismatch: missing expected columns {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("write failed: {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
