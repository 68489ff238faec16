//! Core file lifecycle logic for Filekeep.
//!
//! This crate contains the lifecycle protocol with ZERO web or database dependencies.
//! The catalog is reached through the [`file::FileCatalog`] trait, implemented by the db crate.
//!
//! # Modules
//!
//! - `file` - Save/read/soft-delete/hard-delete coordination
//! - `storage` - Blob store abstraction and its backends
//! - `naming` - Storage name generation

pub mod file;
pub mod naming;
pub mod storage;
