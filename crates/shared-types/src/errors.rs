//! # Error Types
//!
//! Defines error types used across crates.

use thiserror::Error;

/// Failures of the persistence collaborator.
///
/// A missing photo is not an error: lookups return `Option`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not complete the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
