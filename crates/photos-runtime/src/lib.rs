//! # Photos Runtime Library
//!
//! Exposes configuration loading and subsystem wiring for testing.
//! The main entry point is the `main.rs` binary.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod container;

pub use config::{IdentityConfig, RuntimeConfig, RuntimeConfigError};
pub use container::PhotosRuntime;
