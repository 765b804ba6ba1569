//! Operation handlers and the per-request binding produced by a match.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::response::Response;
use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::http::error::HandlerError;
use crate::http::request::ApiRequest;
use crate::routing::resource::Operation;

/// What every operation handler resolves to.
pub type HandlerResult = Result<Response, HandlerError>;

/// An operation handler: `(request, params, config) -> response`.
///
/// Implemented for every `Fn(ApiRequest, PathParams, S) -> impl Future`, so
/// plain `async fn`s can be registered directly on a [`Resource`].
///
/// [`Resource`]: crate::routing::Resource
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, req: ApiRequest, params: PathParams, config: S) -> BoxFuture<'static, HandlerResult>;
}

impl<S, F, Fut> Handler<S> for F
where
    F: Fn(ApiRequest, PathParams, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: ApiRequest, params: PathParams, config: S) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(req, params, config))
    }
}

/// Named values captured from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A matched operation, bound to the parameters captured from one request.
///
/// Created fresh by every successful match and consumed by [`call`](Self::call).
pub struct BoundHandler<S> {
    pub key: Arc<str>,
    pub operation: Operation,
    pub params: PathParams,
    handler: Arc<dyn Handler<S>>,
}

impl<S: 'static> BoundHandler<S> {
    pub(crate) fn new(key: Arc<str>, operation: Operation, params: PathParams, handler: Arc<dyn Handler<S>>) -> Self {
        Self {
            key,
            operation,
            params,
            handler,
        }
    }

    /// Invoke the operation with the request and the router's config.
    pub fn call(self, req: ApiRequest, config: S) -> BoxFuture<'static, HandlerResult> {
        self.handler.call(req, self.params, config)
    }
}

impl<S> fmt::Debug for BoundHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandler")
            .field("key", &self.key)
            .field("operation", &self.operation)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
