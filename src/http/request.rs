//! Request envelope handed to operation handlers.
//!
//! # Responsibilities
//! - Hold the buffered request (head + body)
//! - Expose query parameters and JSON bodies
//! - Generate links through the matched router's path table
//!
//! # Design Decisions
//! - Body buffered by the dispatcher, bounded by config
//! - Links carry the base URL resolved once per request

use axum::{
    body::Bytes,
    http::{request::Parts, HeaderMap, Method, Request, Uri},
};
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::http::error::HttpError;
use crate::routing::{Links, RoutingResult};

/// Header used to correlate logs for one request.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A buffered HTTP request plus the links of the router that matched it.
#[derive(Debug)]
pub struct ApiRequest {
    parts: Parts,
    body: Bytes,
    links: Links,
}

impl ApiRequest {
    pub fn new(parts: Parts, body: Bytes, links: Links) -> Self {
        Self { parts, body, links }
    }

    /// Build from a complete `http::Request`.
    pub fn from_request(request: Request<Bytes>, links: Links) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, body, links)
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn request_id(&self) -> Option<&str> {
        self.parts.headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decoded query string pairs, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default()
    }

    /// First value of the query parameter `name`.
    pub fn query(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Deserialize the body as JSON.
    ///
    /// Malformed JSON is a 400; well-formed JSON of the wrong shape is a 422.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            if e.is_data() {
                HttpError::unprocessable(e.to_string())
            } else {
                HttpError::bad_request(e.to_string())
            }
        })
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Absolute URL of another operation of the same router.
    pub fn url_for(&self, key: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> RoutingResult<String> {
        self.links.url_for(key, params, query)
    }
}
