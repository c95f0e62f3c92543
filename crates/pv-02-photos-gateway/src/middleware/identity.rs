//! Identity middleware.
//!
//! Resolves `Authorization: Bearer <token>` through an [`IdentityValidator`]
//! and attaches the resulting [`IdentityAssertion`] to the request.

use crate::domain::error::{ApiError, IdentityError};
use crate::ports::outbound::IdentityValidator;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use shared_types::IdentityAssertion;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::debug;

/// Identity layer
#[derive(Clone)]
pub struct IdentityLayer {
    validator: Arc<dyn IdentityValidator>,
}

impl IdentityLayer {
    pub fn new(validator: Arc<dyn IdentityValidator>) -> Self {
        Self { validator }
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityService {
            inner,
            validator: Arc::clone(&self.validator),
        }
    }
}

/// Identity service
#[derive(Clone)]
pub struct IdentityService<S> {
    inner: S,
    validator: Arc<dyn IdentityValidator>,
}

impl<S> Service<Request<Body>> for IdentityService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let validator = Arc::clone(&self.validator);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let identity: Result<IdentityAssertion, IdentityError> =
                bearer_token(&req).and_then(|token| validator.validate(token));

            match identity {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    inner.call(req).await
                }
                Err(e) => {
                    debug!(path = %req.uri().path(), reason = %e, "Identity rejected");
                    Ok(ApiError::from(e).into_response())
                }
            }
        })
    }
}

/// Extract the bearer credential from the `Authorization` header.
///
/// The scheme name is case-insensitive.
pub fn bearer_token<B>(req: &Request<B>) -> Result<&str, IdentityError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(IdentityError::MissingToken)?
        .to_str()
        .map_err(|_| IdentityError::MalformedHeader)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(IdentityError::MalformedHeader)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(IdentityError::MalformedHeader);
    }
    Ok(token)
}
