//! Viewer request handling.
//!
//! # Responsibilities
//! - Convert an inbound HTTP request into the edge event request shape
//! - Resolve the request ID stamped by the middleware
//! - Attach the default storage origin before the origin-request stage
//!
//! # Design Decisions
//! - HTTP/2 requests carry the host in `:authority`; it is surfaced as `host`
//! - Header values that are not UTF-8 are converted lossily

use std::net::IpAddr;

use axum::http::request::Parts;
use uuid::Uuid;

use crate::event::{Origin, Request, S3Origin};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the viewer-request record from HTTP request parts.
pub fn to_edge_request(parts: &Parts, client_ip: Option<IpAddr>) -> Request {
    let mut request = Request {
        client_ip: client_ip.map(|ip| ip.to_string()),
        method: parts.method.as_str().to_string(),
        querystring: parts.uri.query().unwrap_or_default().to_string(),
        uri: parts.uri.path().to_string(),
        ..Request::default()
    };

    for (name, value) in parts.headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        request.headers.append(name.as_str(), value);
    }

    if !request.headers.contains("host") {
        if let Some(authority) = parts.uri.authority() {
            request.headers.set("Host", authority.as_str());
        }
    }

    request
}

/// Request ID from the middleware, or a fresh one.
pub fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Point the request at the bucket, as the CDN does for a storage origin:
/// the origin descriptor is attached and `host` becomes the bucket domain.
pub fn attach_origin(mut request: Request, origin: &S3Origin) -> Request {
    request.headers.set("Host", origin.domain_name.clone());
    request.origin = Some(Origin::S3(origin.clone()));
    request
}
