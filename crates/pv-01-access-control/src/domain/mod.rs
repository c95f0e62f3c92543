//! # Domain Layer
//!
//! Pure authorization and signing logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod canonical;
pub mod config;
pub mod entities;
pub mod errors;
pub mod ownership;
pub mod signer;
