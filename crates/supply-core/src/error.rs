//! Error types for supply-core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for profile store operations
pub type Result<T> = std::result::Result<T, SupplyError>;

/// Profile store error types
#[derive(Error, Debug)]
pub enum SupplyError {
    #[error("An entry already exists for key: {0}")]
    DuplicateEntry(String),

    #[error("No entry found for key: {0}")]
    NotFound(String),

    #[error("Secure store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Stored profile could not be decoded: {0}")]
    DecodeError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Supplement not found: {0}")]
    SupplementNotFound(Uuid),

    #[error("Supplement already tracked: {0}")]
    DuplicateSupplement(Uuid),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SupplyError {
    /// Whether this error is the expected "nothing stored yet" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error means the key is already occupied
    pub fn is_duplicate_entry(&self) -> bool {
        matches!(self, Self::DuplicateEntry(_))
    }
}
