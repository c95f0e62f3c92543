//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the gateway calls
//! - **Outbound (Driven)**: Owner lookup and clock this subsystem needs

pub mod inbound;
pub mod outbound;
