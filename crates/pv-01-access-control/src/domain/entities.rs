//! # Domain Entities
//!
//! Outcomes of the two gates and the validity window carried by a signed URL.

use super::errors::SigningError;
use shared_types::Timestamp;

// =============================================================================
// Ownership Outcomes
// =============================================================================

/// Result of comparing a caller against a known owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    /// Caller must map this to "forbidden", never to "not found".
    Deny,
}

impl AuthorizationDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Result of authorizing a caller against a photo id.
///
/// `NotFound` is decided before any ownership comparison happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipOutcome {
    Allow,
    Deny,
    NotFound,
}

impl From<AuthorizationDecision> for OwnershipOutcome {
    fn from(decision: AuthorizationDecision) -> Self {
        match decision {
            AuthorizationDecision::Allow => Self::Allow,
            AuthorizationDecision::Deny => Self::Deny,
        }
    }
}

// =============================================================================
// Signed URL Types
// =============================================================================

/// Closed interval `[not_before, not_after]` during which a signed URL is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    not_before: Timestamp,
    not_after: Timestamp,
}

impl ValidityWindow {
    /// Build a window, rejecting `not_before > not_after`.
    pub fn new(not_before: Timestamp, not_after: Timestamp) -> Result<Self, SigningError> {
        if not_before > not_after {
            return Err(SigningError::InvalidWindow {
                not_before,
                not_after,
            });
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }

    pub fn not_before(&self) -> Timestamp {
        self.not_before
    }

    pub fn not_after(&self) -> Timestamp {
        self.not_after
    }

    /// Both ends inclusive.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.not_before <= now && now <= self.not_after
    }
}

/// Why a signed URL was refused.
///
/// Only for logging at the boundary. Anonymous callers see one undifferentiated failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Required parameter missing, duplicated or unparseable.
    Malformed,
    /// Signature does not match the URL and window.
    Tampered,
    /// Signature is genuine but `now` is outside the window.
    Expired,
}

impl InvalidReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Tampered => "tampered",
            Self::Expired => "expired",
        }
    }
}

/// Result of verifying an incoming signed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlVerification {
    Valid,
    Invalid(InvalidReason),
}

impl UrlVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }
}
