//! # Core Domain Entities
//!
//! Defines the entities the access-control core and the photos gateway agree on.
//!
//! ## Clusters
//!
//! - **Identity**: `Subject`, `IdentityAssertion`
//! - **Resources**: `PhotoId`, `PhotoMeta`, `PhotoContent`
//! - **Time**: `Timestamp`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unix timestamp in whole seconds.
pub type Timestamp = u64;

/// Stable unique identifier of an authenticated principal.
///
/// Compared byte-for-byte: `"alice"` and `"Alice"` are different subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    /// Wrap a subject string.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// The subject as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A validated identity, produced per request by the upstream token validator.
///
/// Read-only. The subject is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    subject: Subject,
}

impl IdentityAssertion {
    pub fn new(subject: Subject) -> Self {
        Self { subject }
    }

    /// The authenticated principal.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }
}

// =============================================================================
// CLUSTER B: RESOURCES
// =============================================================================

/// Unique, immutable identifier of a stored photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Generate a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hyphenated lowercase, the same form used in URLs.
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PhotoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Photo metadata as held by the persistence collaborator.
///
/// `owner_id` is set at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMeta {
    pub id: PhotoId,
    pub title: String,
    pub owner_id: Subject,
}

/// Binary photo content with the headers needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoContent {
    pub content: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}
