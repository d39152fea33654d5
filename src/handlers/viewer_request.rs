//! Viewer-request classifier.

use crate::event::Request;
use crate::handlers::EdgeError;
use crate::routing::{classify_host, X_BLUE_GREEN_CONTEXT, X_BLUE_GREEN_HOST};

/// Tag the request with its routing context and original host.
///
/// Fails when the request has no `host` header.
pub fn classify(mut request: Request) -> Result<Request, EdgeError> {
    let host = request
        .headers
        .first_value("host")
        .ok_or(EdgeError::MissingHeader("host"))?
        .to_string();

    tracing::info!(host = %host, "Adding blue green header for host");

    let deployment = classify_host(&host);
    request.headers.set(X_BLUE_GREEN_HOST, host);
    request.headers.set(X_BLUE_GREEN_CONTEXT, deployment.as_str());

    Ok(request)
}
