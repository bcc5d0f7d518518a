use std::time::Duration;
use thiserror::Error;

/// Underlying cause of a failed load attempt.
#[derive(Error, Debug)]
pub enum LoadFailure {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum KanaVizError {
    #[error("Load Error ({origin}): {cause}")]
    Load {
        origin: String,
        #[source]
        cause: LoadFailure,
    },

    #[error("Malformed Record (row {row}): {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Unknown Category: '{0}'")]
    UnknownCategory(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render Error: {0}")]
    Render(String),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl KanaVizError {
    pub fn load(origin: impl Into<String>, cause: impl Into<LoadFailure>) -> Self {
        Self::Load {
            origin: origin.into(),
            cause: cause.into(),
        }
    }
}

pub type KvResult<T> = Result<T, KanaVizError>;
