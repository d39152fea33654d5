//! Response handling and transformation.
//!
//! # Responsibilities
//! - Convert the origin's HTTP response into the edge event response shape
//! - Convert the final event response back into an HTTP response
//! - Map interceptor and origin faults to the statuses the CDN uses
//!
//! # Design Decisions
//! - Bodies are buffered; interceptors may replace them
//! - Framing headers are dropped so the server recomputes them for the
//!   final body
//! - Interceptor faults result in 503, origin transport failures in 502

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::event;
use crate::handlers::EdgeError;

/// Headers describing the framing of a body that may be replaced.
///
/// Only these are recomputed. Other origin headers pass through even when
/// the fallback replaced the body.
const FRAMING_HEADERS: [&str; 3] = ["content-length", "transfer-encoding", "connection"];

/// Build the origin-response record from an upstream response.
pub fn from_origin_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> event::Response {
    let mut response = event::Response::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
    );
    for (name, value) in headers.iter() {
        response
            .headers
            .append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }
    if !body.is_empty() {
        response.set_body_bytes(body);
    }
    response
}

/// Render the final event response for the viewer.
pub fn into_http_response(response: &event::Response) -> Response {
    let status = match response
        .status_code()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
    {
        Some(status) => status,
        None => {
            tracing::error!(status = %response.status, "Edge response carries an invalid status");
            return (StatusCode::BAD_GATEWAY, "Invalid edge response").into_response();
        }
    };

    let mut http = Response::new(Body::from(response.body_bytes()));
    *http.status_mut() = status;

    let headers = http.headers_mut();
    for (name, entry) in response.headers.iter() {
        if FRAMING_HEADERS.contains(&name) {
            continue;
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&entry.value)) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping header that is not valid HTTP"),
        }
    }

    http
}

/// Response for a faulted interceptor.
pub fn function_error(stage: &str, request_id: &str, error: &EdgeError) -> Response {
    tracing::error!(request_id = %request_id, stage = %stage, error = %error, "Edge function failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        format!("The {stage} edge function failed for this request."),
    )
        .into_response()
}
