//! Blob storage for file contents.
//!
//! The [`BlobStore`] trait is the only thing the lifecycle coordinator sees. Backends:
//! - [`OpendalBlobStore`] - Apache OpenDAL: local filesystem, S3-compatible, Azure Blob, memory
//! - [`MemoryBlobStore`] - plain in-process map for tests
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write("key", data)      │ op.stat("key")                     │
//! │ op.read("key")             │ op.delete("key")                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod blob;
mod error;
mod memory;
mod operator;

pub use blob::{BlobStore, validate_key};
pub use error::BlobError;
pub use memory::MemoryBlobStore;
pub use operator::OpendalBlobStore;
