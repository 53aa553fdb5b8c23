//! Uniform `{"detail": ...}` bodies for request rejections, plus `X-Request-Id`.
//!
//! axum's extractors answer malformed requests with plain-text 400/415/422
//! bodies. This middleware rewrites them into the same JSON shape the handlers
//! use for pipeline failures and stamps every response with a request id.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::error_handler::ErrorBody;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn new_request_id() -> String {
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000);
    format!("req-{nanos}")
}

fn is_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY
    )
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Rejection text → detail message. Empty bodies fall back to the status reason.
fn detail_from(status: StatusCode, body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("invalid request")
            .to_string()
    } else {
        text.to_string()
    }
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let request_id = incoming_request_id(req.headers()).unwrap_or_else(new_request_id);

    let res = next.run(req).await;
    let (mut parts, body) = res.into_parts();
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, v);
    }

    if !is_rejection(parts.status) || is_json(&parts.headers) {
        return Response::from_parts(parts, body);
    }

    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let detail = detail_from(parts.status, &bytes);
    debug!(status = %parts.status, %request_id, %detail, "request rejected");

    let body = match serde_json::to_vec(&ErrorBody::new(detail)) {
        Ok(v) => v,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(body))
}
