//! Ports for the photos gateway.

pub mod outbound;
