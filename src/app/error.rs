use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ShelfscanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("{0}")]
    Other(String),
}

impl ShelfscanError {
    /// Errors caused by the caller's request rather than the server side.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<ConfigError> for ShelfscanError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShelfscanError>;
