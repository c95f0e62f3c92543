//! Adapters for the gateway's outbound ports.

pub mod identity;
pub mod memory;
pub mod owner_resolver;
