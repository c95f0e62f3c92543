//! # Ownership Authorizer
//!
//! A caller may operate on a photo only if its subject is the photo's owner.
//! Exact, case-sensitive string equality. No roles, no delegation.

use super::entities::AuthorizationDecision;
use shared_types::Subject;

/// Compare an authenticated caller against a resource owner.
pub fn authorize(caller: &Subject, owner: &Subject) -> AuthorizationDecision {
    if caller.as_str() == owner.as_str() {
        AuthorizationDecision::Allow
    } else {
        AuthorizationDecision::Deny
    }
}
