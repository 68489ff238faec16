//! Blob store backed by Apache OpenDAL.

use std::path::Path;

use bytes::Bytes;
use filekeep_shared::config::StorageProvider;
use opendal::{ErrorKind, Operator, services};

use super::blob::{BlobStore, validate_key};
use super::error::BlobError;

/// Directory (inside the local root) holding in-flight writes before they are renamed into place.
const ATOMIC_WRITE_DIR: &str = ".tmp";

/// Blob store for any provider OpenDAL can reach.
#[derive(Debug, Clone)]
pub struct OpendalBlobStore {
    operator: Operator,
    storage_type: &'static str,
    location: String,
}

impl OpendalBlobStore {
    /// Create a blob store from provider configuration.
    ///
    /// For [`StorageProvider::LocalFs`] the root directory is created if missing, and writes are
    /// staged in a sibling temp directory then renamed, so a failed save never exposes a partial
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: &StorageProvider) -> Result<Self, BlobError> {
        let (operator, location) = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                (build(builder)?, bucket.clone())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                (build(builder)?, container.clone())
            }
            StorageProvider::LocalFs { root } => {
                let root = prepare_local_root(root)?;
                let staging = root.join(ATOMIC_WRITE_DIR);
                let root_str = path_str(&root)?;
                let builder = services::Fs::default()
                    .root(root_str)
                    .atomic_write_dir(path_str(&staging)?);

                (build(builder)?, root_str.to_string())
            }
            StorageProvider::Memory => (build(services::Memory::default())?, "memory".to_string()),
        };

        Ok(Self {
            operator,
            storage_type: provider.name(),
            location,
        })
    }

    /// Check if a blob exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    pub async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        match self.operator.stat(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BlobError::read(key, e)),
        }
    }
}

impl BlobStore for OpendalBlobStore {
    async fn save(&self, key: &str, content: Bytes) -> Result<(), BlobError> {
        validate_key(key)?;
        let size = content.len();

        if self.operator.info().full_capability().write_with_if_not_exists {
            self.operator
                .write_with(key, content)
                .if_not_exists(true)
                .await
                .map_err(|e| {
                    if e.kind() == ErrorKind::ConditionNotMatch {
                        BlobError::already_exists(key)
                    } else {
                        BlobError::write(key, e)
                    }
                })?;
        } else {
            match self.operator.stat(key).await {
                Ok(_) => return Err(BlobError::already_exists(key)),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(BlobError::write(key, e)),
            }

            self.operator
                .write(key, content)
                .await
                .map_err(|e| BlobError::write(key, e))?;
        }

        tracing::debug!(key, size, storage_type = self.storage_type, "Blob written");
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Bytes, BlobError> {
        validate_key(key)?;

        let buffer = self.operator.read(key).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BlobError::not_found(key)
            } else {
                BlobError::read(key, e)
            }
        })?;

        Ok(buffer.to_bytes())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;

        // OpenDAL deletes are idempotent; absence has to be detected up front.
        match self.operator.stat(key).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(BlobError::not_found(key)),
            Err(e) => return Err(BlobError::delete(key, e)),
        }

        self.operator
            .delete(key)
            .await
            .map_err(|e| BlobError::delete(key, e))?;

        tracing::debug!(key, storage_type = self.storage_type, "Blob deleted");
        Ok(())
    }

    fn storage_type(&self) -> &str {
        self.storage_type
    }

    fn location(&self) -> &str {
        &self.location
    }
}

fn build<B: opendal::Builder>(builder: B) -> Result<Operator, BlobError> {
    Ok(Operator::new(builder)
        .map_err(|e| BlobError::configuration(e.to_string()))?
        .finish())
}

fn prepare_local_root(root: &Path) -> Result<std::path::PathBuf, BlobError> {
    std::fs::create_dir_all(root.join(ATOMIC_WRITE_DIR)).map_err(|e| {
        BlobError::configuration(format!(
            "failed to create storage directory {}: {e}",
            root.display()
        ))
    })?;

    std::fs::canonicalize(root).map_err(|e| {
        BlobError::configuration(format!("failed to resolve {}: {e}", root.display()))
    })
}

fn path_str(path: &Path) -> Result<&str, BlobError> {
    path.to_str()
        .ok_or_else(|| BlobError::configuration("invalid path"))
}
