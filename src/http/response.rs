//! Response helpers for JSON operation handlers.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::error::HandlerError;
use crate::http::request::ApiRequest;
use crate::routing::HandlerResult;

/// 200 with a JSON body.
pub fn ok<T: Serialize>(body: T) -> HandlerResult {
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// 201 pointing at the new entity.
///
/// `Location` is the URL of the operation `key` filled with `params`; the
/// params are echoed back as the JSON body.
pub fn created(req: &ApiRequest, key: &str, params: &[(&str, &str)]) -> HandlerResult {
    let location = req.url_for(key, params, &[])?;
    let body: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();

    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    let value = location.parse().map_err(HandlerError::other)?;
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}

/// 204 with no body.
pub fn no_content() -> HandlerResult {
    Ok(StatusCode::NO_CONTENT.into_response())
}
