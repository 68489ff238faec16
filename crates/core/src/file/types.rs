//! File lifecycle types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use filekeep_shared::types::FileId;
use serde::Serialize;

/// Catalog record describing one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Catalog-assigned identifier.
    pub id: FileId,
    /// Client-supplied display name.
    pub original_name: String,
    /// Generated key addressing the blob store.
    pub storage_name: String,
    /// Backend location descriptor.
    pub path: String,
    /// Byte length.
    pub size: i64,
    /// Backend tag.
    pub storage_type: String,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

/// Input for inserting a catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    /// Client-supplied display name.
    pub original_name: String,
    /// Generated blob key.
    pub storage_name: String,
    /// Backend location descriptor.
    pub path: String,
    /// Byte length.
    pub size: i64,
    /// Backend tag.
    pub storage_type: String,
}

/// An upload as received from a client.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Client-supplied display name.
    pub original_name: String,
    /// File bytes.
    pub content: Bytes,
}

impl UploadInput {
    /// Create an upload input.
    #[must_use]
    pub fn new(original_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            content: content.into(),
        }
    }
}

/// A live file together with its bytes.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Catalog record.
    pub record: FileRecord,
    /// File bytes.
    pub content: Bytes,
}

/// Request-scoped data carried through every lifecycle operation for log correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlation id of the inbound request.
    pub request_id: String,
    /// File addressed by the request, if any.
    pub file_id: Option<FileId>,
}

impl RequestContext {
    /// Create a context for a request that does not address a file.
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            file_id: None,
        }
    }

    /// Attach the addressed file id.
    #[must_use]
    pub fn with_file_id(mut self, id: FileId) -> Self {
        self.file_id = Some(id);
        self
    }
}
