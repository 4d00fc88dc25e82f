//! Error types for QueryDeck.
//!
//! Defines the main error enum used throughout the engine. Every variant is
//! scoped to the operation that raised it; none of them is fatal.

use thiserror::Error;

/// Main error type for QueryDeck operations.
#[derive(Error, Debug)]
pub enum QueryDeckError {
    /// The persisted workspace record is missing, unreadable or corrupt.
    #[error("Persistence read error: {0}")]
    PersistenceRead(String),

    /// The workspace record could not be written.
    #[error("Persistence write error: {0}")]
    PersistenceWrite(String),

    /// A row-data resource could not be fetched (non-success status, network failure).
    #[error("Resource fetch error: {0}")]
    ResourceFetch(String),

    /// Delimited text could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, out-of-range values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryDeckError {
    /// Creates a persistence read error with the given message.
    pub fn persistence_read(msg: impl Into<String>) -> Self {
        Self::PersistenceRead(msg.into())
    }

    /// Creates a persistence write error with the given message.
    pub fn persistence_write(msg: impl Into<String>) -> Self {
        Self::PersistenceWrite(msg.into())
    }

    /// Creates a resource fetch error with the given message.
    pub fn resource_fetch(msg: impl Into<String>) -> Self {
        Self::ResourceFetch(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::PersistenceRead(_) => "Persistence Read Error",
            Self::PersistenceWrite(_) => "Persistence Write Error",
            Self::ResourceFetch(_) => "Resource Fetch Error",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    ///
    /// Used when the message is shown inside a session's error banner,
    /// where the category is already implied.
    pub fn message(&self) -> &str {
        match self {
            Self::PersistenceRead(m)
            | Self::PersistenceWrite(m)
            | Self::ResourceFetch(m)
            | Self::Decode(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Result type alias using QueryDeckError.
pub type Result<T> = std::result::Result<T, QueryDeckError>;
