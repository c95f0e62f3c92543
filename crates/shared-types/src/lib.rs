//! # Shared Types Crate
//!
//! Domain entities shared by every Photo-Vault crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types are defined here.
//! - **Narrow Identity**: the only attribute of an authenticated caller that
//!   crosses a crate boundary is its [`Subject`]. Token formats stay upstream.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
