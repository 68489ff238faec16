//! Storage name generation.
//!
//! Blobs are never stored under the client's filename. Each upload gets a fresh opaque name
//! so that two clients uploading `report.pdf` cannot clash and no client-controlled text reaches
//! a storage path.

use uuid::Uuid;

/// Source of collision-resistant storage names.
pub trait NameGenerator: Send + Sync {
    /// Produces a new storage name. Infallible.
    fn generate(&self) -> String;
}

/// Generates random (v4) UUIDs rendered as hyphenated lowercase text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNameGenerator;

impl UuidNameGenerator {
    /// Create a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NameGenerator for UuidNameGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
