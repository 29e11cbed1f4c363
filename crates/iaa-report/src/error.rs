//! Error types for result consumers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Statistics I/O failed for {path}: {source}")]
    StatisticsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
