//! In-process blob store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use bytes::Bytes;

use super::blob::{BlobStore, validate_key};
use super::error::BlobError;

/// Blob store keeping every blob in a map. Used as a test double.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.blobs
            .read()
            .is_ok_and(|blobs| blobs.contains_key(key))
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().map_or(0, |blobs| blobs.len())
    }

    /// Whether the store holds no blobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    async fn save(&self, key: &str, content: Bytes) -> Result<(), BlobError> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| BlobError::write(key, e))?;
        match blobs.entry(key.to_string()) {
            Entry::Occupied(_) => Err(BlobError::already_exists(key)),
            Entry::Vacant(slot) => {
                slot.insert(content);
                Ok(())
            }
        }
    }

    async fn read(&self, key: &str) -> Result<Bytes, BlobError> {
        validate_key(key)?;
        let blobs = self.blobs.read().map_err(|e| BlobError::read(key, e))?;
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| BlobError::delete(key, e))?;
        blobs
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::not_found(key))
    }

    fn storage_type(&self) -> &str {
        "memory"
    }

    fn location(&self) -> &str {
        "memory"
    }
}
