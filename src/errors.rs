// errors.rs
use crate::scraper::ScraperError;

/// Failures of the durable store (filesystem, serialized payloads).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corrupt payload in {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Spreadsheet export failed: {0}")]
    Xlsx(String),
}

/// Anything that can stop a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
