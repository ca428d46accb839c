use reqwest::StatusCode;
use std::fmt;

/// The four network call sites of a scrape session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Handshake,
    CountQuery,
    FullQuery,
    Detail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Handshake => "handshake",
            Stage::CountQuery => "count query",
            Stage::FullQuery => "full query",
            Stage::Detail => "listing detail",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("{stage} request returned status code {status}")]
    Upstream { stage: Stage, status: StatusCode },

    #[error("Network error during {stage}: {message}")]
    Network { stage: Stage, message: String },

    #[error("JSON parse error during {stage}: {message}")]
    JsonParse { stage: Stage, message: String },

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// Status code of a non-success upstream response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ScraperError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            ScraperError::Upstream { stage, .. }
            | ScraperError::Network { stage, .. }
            | ScraperError::JsonParse { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
