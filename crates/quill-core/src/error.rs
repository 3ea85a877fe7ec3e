use thiserror::Error;

use crate::types::DocumentId;

/// Top-level error type for Quill.
///
/// Speech-source failures are split the way a host needs to react to them:
/// `SpeechUnavailable` never goes away on retry, `StartFailure` might (the user
/// can grant a permission and toggle again).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuillError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech recognition is not available on this platform")]
    SpeechUnavailable,

    #[error("Speech recognition failed to start: {0}")]
    StartFailure(String),

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Dictation error: {0}")]
    Dictation(String),

    #[error("No dictation session registered for document {0}")]
    UnknownDocument(DocumentId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for QuillError {
    fn from(err: toml::de::Error) -> Self {
        QuillError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for QuillError {
    fn from(err: toml::ser::Error) -> Self {
        QuillError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(err: serde_json::Error) -> Self {
        QuillError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Quill operations.
pub type Result<T> = std::result::Result<T, QuillError>;
