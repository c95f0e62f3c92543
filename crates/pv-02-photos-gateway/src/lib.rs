//! PV-02 Photos Gateway - HTTP surface of the photo service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     PHOTOS GATEWAY (pv-02)                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   TracingLayer (http_request span, path only)                    │
//! │        │                                                         │
//! │   ┌────┴──────────────────────────┐   ┌───────────────────────┐  │
//! │   │ Protected routes              │   │ Anonymous routes      │  │
//! │   │ IdentityLayer (Bearer → 401)  │   │ /signed-content       │  │
//! │   │ Ownership gate (403 / 404)    │   │ Signed URL gate (403) │  │
//! │   └────┬──────────────────────────┘   └──────────┬────────────┘  │
//! │        └───────────────┬─────────────────────────┘               │
//! │                        │                                         │
//! │          AccessControlApi (pv-01)  +  PhotoRepository            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pv_02_photos_gateway::{GatewayConfig, PhotosGatewayService};
//!
//! let service = PhotosGatewayService::new(config, access, photos, identity)?;
//! service.start(shutdown_signal).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::identity::{Hs256IdentityValidator, StaticIdentityValidator};
pub use adapters::memory::InMemoryPhotoRepository;
pub use adapters::owner_resolver::RepositoryOwnerResolver;
pub use domain::config::{ConfigError, GatewayConfig, HttpConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError, IdentityError};
pub use domain::media::{sniff_media_type, MediaType};
pub use domain::types::{AddPhotoRequest, PhotoDto, UpdatePhotoRequest};
pub use middleware::{IdentityLayer, TracingLayer};
pub use ports::outbound::{IdentityValidator, PhotoRepository};
pub use service::{AppState, PhotosGatewayService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
