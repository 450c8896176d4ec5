//! API key authentication middleware
//!
//! A single shared key, accepted from the `X-API-KEY` header or from the
//! `api_key` / `key` query parameters. Comparison is constant-time. The
//! index, `/health` and `/ready` stay public so probes and humans can find
//! their way without a key.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::{Query, Request},
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Paths reachable without a key (exact match)
const PUBLIC_PATHS: [&str; 3] = ["/", "/health", "/ready"];

#[derive(Debug, Default, Deserialize)]
struct KeyParams {
    api_key: Option<String>,
    key: Option<String>,
}

/// Layer that applies API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuthLayer {
    api_key: Option<Arc<SecretString>>,
}

impl ApiKeyAuthLayer {
    /// Gate requests on `api_key`; `None` lets everything through
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key: api_key.map(Arc::new),
        }
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            api_key: self.api_key.clone(),
        }
    }
}

/// Middleware service for API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuth<S> {
    inner: S,
    api_key: Option<Arc<SecretString>>,
}

impl<S> Service<Request> for ApiKeyAuth<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let authorized = match &self.api_key {
            None => true,
            Some(_) if PUBLIC_PATHS.contains(&req.uri().path()) => true,
            Some(expected) => presented_key(&req).is_some_and(|key| keys_match(expected, &key)),
        };

        if !authorized {
            debug!(path = %req.uri().path(), "Rejected request without a valid API key");
            return Box::pin(async { Ok(ApiError::Unauthorized.into_response()) });
        }

        // Take the service that was driven to readiness, leave a fresh clone
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

/// Key from the header, falling back to the query string
fn presented_key(req: &Request) -> Option<String> {
    if let Some(value) = req.headers().get(API_KEY_HEADER) {
        return value.to_str().ok().map(str::to_string);
    }
    let Query(params) = Query::<KeyParams>::try_from_uri(req.uri()).ok()?;
    params.api_key.or(params.key)
}

fn keys_match(expected: &SecretString, presented: &str) -> bool {
    expected
        .expose_secret()
        .as_bytes()
        .ct_eq(presented.as_bytes())
        .into()
}
