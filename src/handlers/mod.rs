//! Edge interceptors.
//!
//! # Data Flow
//! ```text
//! viewer-request   → viewer_request::classify  (writes x-blue-green-host/-context)
//! origin-request   → origin_request::rewrite   (reads -context, sets origin path)
//! origin-response  → origin_response::fallback (reads -host, serves index on 403/404)
//! ```
//!
//! # Design Decisions
//! - Interceptors never call each other; headers are the only channel
//! - Every fault is returned, never swallowed; the caller decides how the
//!   viewer sees it

pub mod error;
pub mod origin_request;
pub mod origin_response;
pub mod viewer_request;

use serde::Serialize;

pub use error::EdgeError;
pub use origin_request::rewrite;
pub use origin_response::fallback;
pub use viewer_request::classify;

use crate::event::{CloudFrontEvent, EventType, Request, Response};
use crate::fallback::IndexFetcher;

/// What an interceptor hands back to the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Request(Request),
    Response(Response),
}

/// Run the interceptor bound to `stage` on the event's first record.
pub async fn invoke(
    stage: EventType,
    event: CloudFrontEvent,
    fetcher: &dyn IndexFetcher,
) -> Result<Outcome, EdgeError> {
    let payload = event.into_payload()?;
    match stage {
        EventType::ViewerRequest => classify(payload.request).map(Outcome::Request),
        EventType::OriginRequest => rewrite(payload.request).map(Outcome::Request),
        EventType::OriginResponse => {
            let response = payload.response.ok_or(EdgeError::MissingResponse)?;
            fallback(&payload.request, response, fetcher)
                .await
                .map(Outcome::Response)
        }
        // No interceptor is bound here; the response passes through.
        EventType::ViewerResponse => payload
            .response
            .map(Outcome::Response)
            .ok_or(EdgeError::MissingResponse),
    }
}
