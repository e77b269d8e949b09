//! Error types for the kashi lyrics annotation engine
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for error propagation at the edges.
//!
//! "Not found" is never an error in this crate: dictionary and store misses
//! flow back as `Ok(None)` / empty sequences. The variants here cover genuine
//! collaborator faults and invalid input.

use thiserror::Error;

/// Main error type for kashi operations
#[derive(Error, Debug)]
pub enum KashiError {
    /// Input lyrics were blank or whitespace-only
    #[error("Lyrics cannot be empty")]
    EmptyInput,

    /// An identifier passed to the id-lookup path was malformed.
    /// The resolver's id path swallows this as a lookup miss.
    #[error("Malformed dictionary id: {0}")]
    MalformedId(String),

    /// The dictionary engine failed (not a miss)
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// The translation engine failed
    #[error("Translator error: {0}")]
    Translator(String),

    /// The persistent line store failed
    #[error("Line store error: {0}")]
    Store(String),

    /// The static kanji metadata table could not be loaded
    #[error("Kanji data error: {0}")]
    KanjiData(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for kashi operations
pub type Result<T> = std::result::Result<T, KashiError>;

/// Convert anyhow::Error to KashiError
impl From<anyhow::Error> for KashiError {
    fn from(err: anyhow::Error) -> Self {
        KashiError::Other(err.to_string())
    }
}
