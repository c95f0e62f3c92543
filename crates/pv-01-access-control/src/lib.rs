//! # Access Control Subsystem (PV-01)
//!
//! Decides who may touch a photo and mints the short-lived links that let an
//! anonymous client fetch one.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure authorization and signing logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//! - **Adapters Layer** (`adapters/`): In-memory port implementations
//!
//! ## Gates
//!
//! Every endpoint is guarded by exactly one of:
//! - **Ownership**: the caller's subject must equal the photo's owner
//! - **Signed URL**: HMAC-SHA256 over the canonical URL and its validity window
//!
//! ## Security Notes
//!
//! - **Integrity First**: the signature is checked before the time window is trusted
//! - **Constant-Time**: signature comparison uses the `subtle` crate
//! - **Stateless**: no session or token store; links cannot be revoked before expiry

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::memory::InMemoryOwnerResolver;
pub use domain::canonical::{
    CanonicalRequest, CANONICAL_PREFIX, SIGNATURE_PARAM, VALID_FROM_PARAM, VALID_TO_PARAM,
};
pub use domain::config::{
    content_path, AccessConfig, DEFAULT_BASE_URL, DEFAULT_URL_VALIDITY, MIN_SIGNING_KEY_LEN,
};
pub use domain::entities::{
    AuthorizationDecision, InvalidReason, OwnershipOutcome, UrlVerification, ValidityWindow,
};
pub use domain::errors::{ConfigError, SigningError};
pub use domain::ownership::authorize;
pub use domain::signer::{SigningKey, UrlSigner};
pub use ports::inbound::AccessControlApi;
pub use ports::outbound::{ManualTimeSource, OwnerResolver, SystemTimeSource, TimeSource};
pub use service::AccessControlService;
