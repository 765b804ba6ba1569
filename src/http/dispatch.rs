//! Request dispatch over one or many routers.
//!
//! # Responsibilities
//! - Buffer the request body (bounded)
//! - Try routers in order; `NotFound` falls through in multi-router mode
//! - Invoke the bound handler with the router's config
//! - Convert handler failures into responses
//!
//! # Design Decisions
//! - A handler's `HttpError` is the response, unchanged
//! - Every other failure, panics included, becomes a 500 carrying the
//!   error text and its source chain
//! - All logging for routing outcomes happens here

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{header, request::Parts, Request},
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::http::error::{error_trace, HandlerError, HttpError};
use crate::http::request::{ApiRequest, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::Router;

/// Default cap on buffered request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// One router; no prefix pre-check.
    Single,
    /// Routers tried in order, skipping those whose prefix cannot match.
    Multiple,
}

/// Dispatches HTTP requests to compiled routers.
pub struct Dispatcher<S> {
    routers: Vec<Arc<Router<S>>>,
    mode: Mode,
    base_url: Option<String>,
    max_body_bytes: usize,
}

impl<S> Dispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn single(router: Router<S>) -> Self {
        Self::with_mode(vec![Arc::new(router)], Mode::Single)
    }

    pub fn multiple(routers: impl IntoIterator<Item = Router<S>>) -> Self {
        Self::with_mode(routers.into_iter().map(Arc::new).collect(), Mode::Multiple)
    }

    fn with_mode(routers: Vec<Arc<Router<S>>>, mode: Mode) -> Self {
        Self {
            routers,
            mode,
            base_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Fixed base URL for generated links. Without one, links are built from
    /// the request's `Host` header.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn routers(&self) -> &[Arc<Router<S>>] {
        &self.routers
    }

    /// Route and run one request.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let matched = self
            .routers
            .iter()
            .filter(|router| self.mode == Mode::Single || router.matches_start(&path))
            .find_map(|router| {
                router
                    .match_route(&method, &path)
                    .ok()
                    .map(|bound| (router, bound))
            });

        let Some((router, bound)) = matched else {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, "none", start_time);
            return HttpError::not_found()
                .with_detail(format!("No route for {method} {path}"))
                .into_response();
        };
        let key = Arc::clone(&bound.key);

        if content_length(&parts).is_some_and(|len| len > self.max_body_bytes) {
            tracing::warn!(request_id = %request_id, key = %key, limit = self.max_body_bytes, "Request body too large");
            metrics::record_request(method.as_str(), 413, &key, start_time);
            return HttpError::payload_too_large(self.max_body_bytes).into_response();
        }
        let body = match axum::body::to_bytes(body, self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %request_id, key = %key, error = %e, "Failed to read request body");
                metrics::record_request(method.as_str(), 400, &key, start_time);
                return HttpError::bad_request(format!("Failed to read request body: {e}")).into_response();
            }
        };

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            key = %key,
            params = ?bound.params,
            "Dispatching request"
        );

        let base_url = self.base_url(&parts);
        let req = ApiRequest::new(parts, body, router.links(&base_url));
        let outcome = AssertUnwindSafe(bound.call(req, router.config().clone()))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => failure_response(&request_id, &key, err),
            Err(panic) => panic_response(&request_id, &key, panic),
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), &key, start_time);
        response
    }

    fn base_url(&self, parts: &Parts) -> String {
        if let Some(base_url) = &self.base_url {
            return base_url.clone();
        }
        parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .map(|host| format!("http://{host}"))
            .unwrap_or_default()
    }
}

fn content_length(parts: &Parts) -> Option<usize> {
    parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn failure_response(request_id: &str, key: &str, err: HandlerError) -> Response {
    match err {
        HandlerError::Http(e) => {
            tracing::error!(request_id = %request_id, key = %key, error = %e, "Handler returned an error");
            if let Some(comment) = &e.comment {
                tracing::debug!(request_id = %request_id, trace = %comment);
            }
            e.into_response()
        }
        other => {
            let detail = other.to_string();
            let trace = error_trace(&other);
            tracing::error!(request_id = %request_id, key = %key, error = %detail, "Handler failed");
            tracing::debug!(request_id = %request_id, trace = %trace);
            HttpError::internal(detail, trace).into_response()
        }
    }
}

fn panic_response(request_id: &str, key: &str, panic: Box<dyn Any + Send>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string());
    tracing::error!(request_id = %request_id, key = %key, error = %detail, "Handler panicked");
    HttpError::internal(detail, format!("panic in handler for {key}")).into_response()
}
