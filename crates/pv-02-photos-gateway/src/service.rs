//! Photos gateway service - router assembly and HTTP server lifecycle.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::handlers;
use crate::middleware::{IdentityLayer, TracingLayer};
use crate::ports::outbound::{IdentityValidator, PhotoRepository};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use pv_01_access_control::AccessControlApi;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub access: Arc<dyn AccessControlApi>,
    pub photos: Arc<dyn PhotoRepository>,
    pub config: Arc<GatewayConfig>,
}

/// Photos gateway service
pub struct PhotosGatewayService {
    config: GatewayConfig,
    state: AppState,
    identity: Arc<dyn IdentityValidator>,
}

impl PhotosGatewayService {
    /// Create a new gateway over its collaborators
    pub fn new(
        config: GatewayConfig,
        access: Arc<dyn AccessControlApi>,
        photos: Arc<dyn PhotoRepository>,
        identity: Arc<dyn IdentityValidator>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let state = AppState {
            access,
            photos,
            config: Arc::new(config.clone()),
        };

        Ok(Self {
            config,
            state,
            identity,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router.
    ///
    /// Identity is enforced only on the protected routes; the signed-content
    /// route and `/health` are reachable anonymously.
    pub fn router(&self) -> Router {
        let protected = Router::new()
            .route(
                "/api/photos",
                get(handlers::list_photos).post(handlers::add_photo),
            )
            .route(
                "/api/photos/:id",
                put(handlers::update_photo).delete(handlers::delete_photo),
            )
            .route("/api/photos/:id/meta", get(handlers::get_photo_meta))
            .route("/api/photos/:id/content", get(handlers::get_photo_content))
            .route_layer(IdentityLayer::new(Arc::clone(&self.identity)));

        let anonymous = Router::new()
            .route(
                "/api/photos/:id/signed-content",
                get(handlers::get_signed_content),
            )
            .route("/health", get(handlers::health_check));

        protected
            .merge(anonymous)
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes()))
            .layer(TracingLayer::new())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn start<F>(&self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(addr = %addr, "Starting HTTP server");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;

        info!("Photos gateway stopped");
        Ok(())
    }
}
