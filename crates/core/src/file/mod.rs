//! File lifecycle coordination.
//!
//! This module keeps the blob store and the metadata catalog consistent while each of them can
//! fail independently:
//! - Save: blob first, then catalog row; orphaned blobs are cleaned up best-effort
//! - Read: live catalog row, then blob
//! - Soft delete: catalog flag only
//! - Hard delete: soft-deleted row, then blob, then catalog row

mod error;
mod service;
mod types;

pub use error::{CatalogError, FileError};
pub use service::{FileCatalog, FileService};
pub use types::{FileRecord, NewFileRecord, RequestContext, StoredFile, UploadInput};
