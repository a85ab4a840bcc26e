//! Error types for the ovsdb-manager relation
//!
//! Missing relation data is never an error here; it is expressed as `None`.
//! These variants cover collaborator failures and bad configuration only.

use thiserror::Error;

/// Result type alias for relation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the relation crate
#[derive(Error, Debug)]
pub enum Error {
    /// Relation data could not be read from the transport
    #[error("Relation data error: {0}")]
    RelationData(String),

    /// Flag store failures
    #[error("State store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A hook pattern could not be parsed or bound
    #[error("Invalid hook pattern: {0}")]
    InvalidPattern(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a relation data error
    pub fn relation_data(msg: impl Into<String>) -> Self {
        Self::RelationData(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }
}
