//! Edge event model.
//!
//! # Data Flow
//! ```text
//! platform JSON event
//!     → CloudFrontEvent { Records: [ { cf: { config, request, response? } } ] }
//!     → interceptor receives the first record's request (and response)
//!     → interceptor returns the same shape, serialized back to JSON
//! ```
//!
//! # Design Decisions
//! - Field names follow the platform's camelCase JSON exactly
//! - Headers keep the multi-value `{key, value}` convention
//! - Only the first record is ever processed

pub mod headers;
pub mod request;
pub mod response;

use serde::{Deserialize, Serialize};

pub use headers::{HeaderEntry, Headers};
pub use request::{CustomOrigin, Origin, Request, S3Origin};
pub use response::{BodyEncoding, Response};

use crate::handlers::EdgeError;

/// Interception point in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    OriginRequest,
    OriginResponse,
    ViewerResponse,
}

/// Per-invocation metadata supplied by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    #[serde(default)]
    pub distribution_domain_name: String,

    #[serde(default)]
    pub distribution_id: String,

    pub event_type: EventType,

    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CfPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EventConfig>,

    pub request: Request,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub cf: CfPayload,
}

/// Top-level event document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records")]
    pub records: Vec<Record>,
}

impl CloudFrontEvent {
    /// Wrap a single request (and optional response) into an event.
    pub fn single(config: Option<EventConfig>, request: Request, response: Option<Response>) -> Self {
        Self {
            records: vec![Record {
                cf: CfPayload {
                    config,
                    request,
                    response,
                },
            }],
        }
    }

    /// Take the first record's payload.
    pub fn into_payload(self) -> Result<CfPayload, EdgeError> {
        self.records
            .into_iter()
            .next()
            .map(|record| record.cf)
            .ok_or(EdgeError::EmptyEvent)
    }
}
