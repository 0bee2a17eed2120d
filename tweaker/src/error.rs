//! Error types for the event tweaker

use thiserror::Error;

/// Result type alias for tweaker operations
pub type Result<T> = std::result::Result<T, TweakerError>;

/// Main error type for the tweaker
///
/// Only construction and the command-line host can fail. Applying rules to an
/// event never returns an error; the worst outcome is a dropped event.
#[derive(Error, Debug)]
pub enum TweakerError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TweakerError {
    fn from(err: serde_json::Error) -> Self {
        TweakerError::Serialization(err.to_string())
    }
}

/// Error type for body text encoding and decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharsetError {
    /// The named charset is not available
    #[error("unsupported charset: {0}")]
    Unsupported(String),

    /// The text holds a character the charset cannot represent
    #[error("character {ch:?} cannot be encoded as {charset}")]
    Unmappable { charset: &'static str, ch: char },
}
