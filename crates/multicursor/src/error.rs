use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for fallible multicursor operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by the configuration and clipboard layers. Engine commands
/// themselves never fail.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("clipboard: {0}")]
    /// The grouped-lines side channel does not agree with the flat text.
    Clipboard(String),
    #[error("config: {0}")]
    /// A configuration value is out of range.
    Config(String),
    #[error("json: {0}")]
    /// JSON encoding or decoding failed.
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
