//! File lifecycle service implementation.

use std::future::Future;
use std::sync::Arc;

use filekeep_shared::types::FileId;
use tracing::{debug, info, warn};

use super::error::{CatalogError, FileError};
use super::types::{FileRecord, NewFileRecord, RequestContext, StoredFile, UploadInput};
use crate::naming::NameGenerator;
use crate::storage::BlobStore;

/// Metadata catalog for file records.
///
/// This trait is implemented by the db crate. Every write is all-or-nothing.
pub trait FileCatalog: Send + Sync {
    /// Insert a record and return its assigned id.
    ///
    /// A taken `storage_name` is [`CatalogError::DuplicateKey`].
    fn insert(
        &self,
        record: NewFileRecord,
    ) -> impl Future<Output = Result<FileId, CatalogError>> + Send;

    /// Find the record matching both `id` and the exact `is_deleted` flag.
    fn get_by_id(
        &self,
        id: FileId,
        is_deleted: bool,
    ) -> impl Future<Output = Result<FileRecord, CatalogError>> + Send;

    /// Flag a live record as deleted.
    fn soft_delete(&self, id: FileId) -> impl Future<Output = Result<u64, CatalogError>> + Send;

    /// Remove a soft-deleted record.
    fn hard_delete(&self, id: FileId) -> impl Future<Output = Result<u64, CatalogError>> + Send;
}

/// Coordinates the blob store and the catalog through a file's lifecycle.
pub struct FileService<C, B, G> {
    catalog: Arc<C>,
    blobs: Arc<B>,
    names: Arc<G>,
}

impl<C, B, G> Clone for FileService<C, B, G> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            blobs: Arc::clone(&self.blobs),
            names: Arc::clone(&self.names),
        }
    }
}

impl<C, B, G> FileService<C, B, G>
where
    C: FileCatalog,
    B: BlobStore,
    G: NameGenerator,
{
    /// Create a new file service.
    #[must_use]
    pub fn new(catalog: Arc<C>, blobs: Arc<B>, names: Arc<G>) -> Self {
        Self {
            catalog,
            blobs,
            names,
        }
    }

    /// The blob store holding file contents.
    #[must_use]
    pub fn blob_store(&self) -> &B {
        &self.blobs
    }

    /// Store an upload and register it in the catalog.
    ///
    /// Bytes are written first and never replace an existing blob. If the catalog insert then
    /// fails the blob is removed again, best-effort, and the insert error is returned. A
    /// duplicate storage name leaves the blob in place since it is addressed by an existing row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The original name is empty
    /// - The blob write fails, including when the generated name is already stored
    /// - The catalog insert fails (including a storage name collision)
    pub async fn save(
        &self,
        ctx: &RequestContext,
        input: UploadInput,
    ) -> Result<FileId, FileError> {
        if input.original_name.is_empty() {
            return Err(FileError::validation("file name is empty"));
        }

        let size = i64::try_from(input.content.len())
            .map_err(|_| FileError::validation("file is too large"))?;
        let storage_name = self.names.generate();

        self.blobs.save(&storage_name, input.content).await?;

        let record = NewFileRecord {
            original_name: input.original_name,
            storage_name: storage_name.clone(),
            path: self.blobs.location().to_string(),
            size,
            storage_type: self.blobs.storage_type().to_string(),
        };

        match self.catalog.insert(record).await {
            Ok(id) => {
                info!(
                    op = "save",
                    request_id = %ctx.request_id,
                    file_id = %id,
                    storage_name = %storage_name,
                    size,
                    "File saved"
                );
                Ok(id)
            }
            // A duplicate key means the blob belongs to an existing record.
            Err(e @ CatalogError::DuplicateKey(_)) => Err(e.into()),
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&storage_name).await {
                    warn!(
                        op = "save",
                        request_id = %ctx.request_id,
                        storage_name = %storage_name,
                        error = %cleanup,
                        "Failed to remove orphaned blob"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Load a live file and its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotFound`] for unknown and soft-deleted ids. A live record whose blob
    /// is missing is a storage error.
    pub async fn read(&self, ctx: &RequestContext, id: FileId) -> Result<StoredFile, FileError> {
        let record = self.catalog.get_by_id(id, false).await?;
        let content = self.blobs.read(&record.storage_name).await?;

        debug!(
            op = "read",
            request_id = %ctx.request_id,
            file_id = %id,
            size = content.len(),
            "File read"
        );
        Ok(StoredFile { record, content })
    }

    /// Hide a live file from reads. Its bytes stay in the blob store.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotFound`] if the id is unknown or already deleted.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: FileId) -> Result<(), FileError> {
        self.catalog.soft_delete(id).await?;

        info!(op = "soft_delete", request_id = %ctx.request_id, file_id = %id, "File soft-deleted");
        Ok(())
    }

    /// Purge a soft-deleted file: bytes first, then the catalog row.
    ///
    /// A blob that is already gone counts as purged, so a retry after a failed row removal
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The id is unknown or not soft-deleted
    /// - The blob delete fails (the catalog is left untouched)
    /// - The row removal fails
    pub async fn hard_delete(&self, ctx: &RequestContext, id: FileId) -> Result<(), FileError> {
        let record = self.catalog.get_by_id(id, true).await?;

        match self.blobs.delete(&record.storage_name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(
                    op = "hard_delete",
                    request_id = %ctx.request_id,
                    file_id = %id,
                    storage_name = %record.storage_name,
                    "Blob already absent"
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.catalog.hard_delete(id).await?;

        info!(
            op = "hard_delete",
            request_id = %ctx.request_id,
            file_id = %id,
            storage_name = %record.storage_name,
            "File purged"
        );
        Ok(())
    }
}
