//! Storage error types.

use thiserror::Error;

/// Blob store operation errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// No blob stored under the key.
    #[error("blob not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Writing the blob failed; nothing readable was left under the key.
    #[error("failed to write blob {key}: {message}")]
    Write {
        /// Storage key being written.
        key: String,
        /// Backend error message.
        message: String,
    },

    /// Reading the blob failed for a reason other than absence.
    #[error("failed to read blob {key}: {message}")]
    Read {
        /// Storage key being read.
        key: String,
        /// Backend error message.
        message: String,
    },

    /// Removing the blob failed for a reason other than absence.
    #[error("failed to delete blob {key}: {message}")]
    Delete {
        /// Storage key being deleted.
        key: String,
        /// Backend error message.
        message: String,
    },

    /// Invalid storage key format.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl BlobError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a write error.
    #[must_use]
    pub fn write(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Write {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a write error for a key that is already taken.
    #[must_use]
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::write(key, "blob already exists")
    }

    /// Create a read error.
    #[must_use]
    pub fn read(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a delete error.
    #[must_use]
    pub fn delete(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Delete {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error reports an absent key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
