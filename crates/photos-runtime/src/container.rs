//! # Subsystem Container
//!
//! Wires the access-control core (pv-01) to the photos gateway (pv-02).
//!
//! ```text
//! InMemoryPhotoRepository ──→ RepositoryOwnerResolver ──→ AccessControlService
//!          │                                                     │
//!          └──────────────→ PhotosGatewayService ←───────────────┘
//!                                   ↑
//!                        Hs256IdentityValidator
//! ```

use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use pv_01_access_control::{AccessControlService, SystemTimeSource};
use pv_02_photos_gateway::{
    Hs256IdentityValidator, InMemoryPhotoRepository, PhotoRepository, PhotosGatewayService,
    RepositoryOwnerResolver,
};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// The assembled photo service.
pub struct PhotosRuntime {
    gateway: PhotosGatewayService,
    photos: Arc<InMemoryPhotoRepository>,
}

impl PhotosRuntime {
    /// Build every subsystem from a validated configuration.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let photos = Arc::new(InMemoryPhotoRepository::new());
        let repository: Arc<dyn PhotoRepository> = photos.clone();

        info!(
            base_url = %config.access.base_url,
            url_validity_secs = config.access.url_validity.as_secs(),
            "Initializing access control"
        );
        let access = AccessControlService::new(
            config.access,
            RepositoryOwnerResolver::new(Arc::clone(&repository)),
            SystemTimeSource,
        )
        .context("access control configuration rejected")?;

        let mut identity = Hs256IdentityValidator::new(&config.identity.jwt_secret);
        if let Some(issuer) = &config.identity.issuer {
            identity = identity.with_issuer(issuer);
        }
        if let Some(audience) = &config.identity.audience {
            identity = identity.with_audience(audience);
        }

        let gateway = PhotosGatewayService::new(
            config.gateway,
            Arc::new(access),
            repository,
            Arc::new(identity),
        )
        .context("gateway configuration rejected")?;

        Ok(Self { gateway, photos })
    }

    /// Shared photo store.
    pub fn photos(&self) -> Arc<InMemoryPhotoRepository> {
        Arc::clone(&self.photos)
    }

    pub fn gateway(&self) -> &PhotosGatewayService {
        &self.gateway
    }

    /// Serve HTTP until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.gateway
            .start(shutdown)
            .await
            .context("HTTP server failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_HTTP_HOST, ENV_HTTP_PORT, ENV_JWT_SECRET, ENV_SIGNING_KEY};

    fn config() -> RuntimeConfig {
        RuntimeConfig::from_lookup(|var| match var {
            ENV_SIGNING_KEY => Some("11".repeat(32)),
            ENV_JWT_SECRET => Some("22".repeat(32)),
            ENV_HTTP_HOST => Some("127.0.0.1".into()),
            ENV_HTTP_PORT => Some("0".into()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_wires_subsystems() {
        let runtime = PhotosRuntime::new(config()).unwrap();
        assert!(runtime.photos().is_empty());
        assert_eq!(runtime.gateway().config().http.port, 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let runtime = PhotosRuntime::new(config()).unwrap();
        let result = runtime.run(async {}).await;
        assert!(result.is_ok());
    }
}
