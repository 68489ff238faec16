//! The blob store capability set.

use std::future::Future;

use bytes::Bytes;

use super::error::BlobError;

/// Byte storage addressed by opaque keys.
///
/// Callers only rely on these three operations, so local disks, object stores and test doubles
/// are interchangeable.
pub trait BlobStore: Send + Sync {
    /// Store `content` under a new `key`.
    ///
    /// Create-only: an existing blob under `key` is left untouched and the call fails with
    /// [`BlobError::Write`]. Atomic from the caller's perspective: on failure no partial blob is
    /// readable under `key`.
    fn save(
        &self,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), BlobError>> + Send;

    /// Load the blob stored under `key`.
    fn read(&self, key: &str) -> impl Future<Output = Result<Bytes, BlobError>> + Send;

    /// Remove the blob stored under `key`.
    ///
    /// An absent key is [`BlobError::NotFound`], distinct from an I/O failure.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), BlobError>> + Send;

    /// Backend tag recorded in the catalog (`local`, `s3`, ...).
    fn storage_type(&self) -> &str;

    /// Backend-specific location descriptor (root directory, bucket, ...).
    fn location(&self) -> &str;
}

/// Reject keys that could escape the store root or collide with its bookkeeping entries.
///
/// # Errors
///
/// Returns [`BlobError::InvalidKey`] for empty keys, keys containing path separators, and keys
/// starting with a dot.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    if key.is_empty() {
        return Err(BlobError::InvalidKey("key is empty".to_string()));
    }
    if key.contains(['/', '\\']) {
        return Err(BlobError::InvalidKey(format!("{key}: contains a path separator")));
    }
    if key.starts_with('.') {
        return Err(BlobError::InvalidKey(format!("{key}: starts with a dot")));
    }
    if key.chars().any(char::is_control) {
        return Err(BlobError::InvalidKey(format!("{key:?}: contains control characters")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3f2b8c4e-1d9a-4c6b-9e7f-0a1b2c3d4e5f")]
    #[case("report.pdf")]
    #[case("a")]
    fn test_valid_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("../etc/passwd")]
    #[case("nested/key")]
    #[case("windows\\key")]
    #[case("..")]
    #[case(".tmp")]
    #[case("line\nbreak")]
    fn test_invalid_keys(#[case] key: &str) {
        assert!(matches!(validate_key(key), Err(BlobError::InvalidKey(_))));
    }
}
