//! Domain layer for the photos gateway.

pub mod config;
pub mod error;
pub mod media;
pub mod types;
