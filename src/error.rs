//! Error types for streamscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Fragment extraction errors
    #[error("Malformed fragment element: {message}")]
    MalformedElement { message: String },

    #[error("Fragment source failed: {message}")]
    SourceRead { message: String },

    // Streaming session errors
    #[error("Transcription session failed: {0}")]
    Session(#[from] crate::transcribe::classify::TranscribeError),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, StreamscribeError>;
