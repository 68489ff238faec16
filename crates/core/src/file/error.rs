//! File lifecycle error types.

use filekeep_shared::{AppError, types::FileId};
use thiserror::Error;

use crate::storage::BlobError;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record matches the id in the requested state.
    #[error("file record not found: {0}")]
    NotFound(FileId),

    /// The storage name is already taken by another record.
    #[error("storage name already exists: {0}")]
    DuplicateKey(String),

    /// The catalog backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

impl CatalogError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// File lifecycle errors.
#[derive(Debug, Error)]
pub enum FileError {
    /// The request is malformed; nothing was touched.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No file in the requested state.
    #[error("file not found: {0}")]
    NotFound(FileId),

    /// The generated storage name collided with an existing record.
    #[error("storage name already exists: {0}")]
    DuplicateKey(String),

    /// Blob store operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] BlobError),

    /// Catalog operation failed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl FileError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<CatalogError> for FileError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::NotFound(id),
            CatalogError::DuplicateKey(name) => Self::DuplicateKey(name),
            CatalogError::Backend(msg) => Self::Catalog(msg),
        }
    }
}

impl From<FileError> for AppError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::Validation(msg) => Self::Validation(msg),
            FileError::NotFound(id) => Self::NotFound(format!("file {id}")),
            FileError::DuplicateKey(name) => Self::Conflict(format!("storage name {name}")),
            FileError::Storage(e) => Self::Storage(e.to_string()),
            FileError::Catalog(msg) => Self::Database(msg),
        }
    }
}
