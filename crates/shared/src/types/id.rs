//! Typed IDs for catalog records.
//!
//! The catalog hands out auto-incrementing integer keys. Wrapping them keeps a file id from being
//! confused with a size or an affected-row count.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// Unique identifier for a file record, assigned by the catalog and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl FileId {
    /// Creates an ID from a raw catalog key.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw catalog key.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for FileId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
