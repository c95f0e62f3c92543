//! Middleware stack for the photos gateway.
//!
//! Layer order: Request → Tracing → (protected routes only) Identity → Handler

pub mod identity;
pub mod tracing;

pub use identity::{bearer_token, IdentityLayer};
pub use tracing::TracingLayer;
