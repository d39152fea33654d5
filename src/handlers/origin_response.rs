//! Origin-response fallback.

use crate::event::{Request, Response};
use crate::fallback::IndexFetcher;
use crate::handlers::EdgeError;
use crate::routing::X_BLUE_GREEN_HOST;

/// Statuses the bucket answers a missing object with.
pub const FALLBACK_STATUSES: [u16; 2] = [403, 404];

/// Whether a status triggers the fallback document.
pub fn is_fallback_status(status: u16) -> bool {
    FALLBACK_STATUSES.contains(&status)
}

/// Replace a missing-object response with the application shell.
///
/// Any other status is returned unchanged.
pub async fn fallback(
    request: &Request,
    mut response: Response,
    fetcher: &dyn IndexFetcher,
) -> Result<Response, EdgeError> {
    let status = response.status_code()?;
    if !is_fallback_status(status) {
        return Ok(response);
    }

    let host = request
        .headers
        .first_value(X_BLUE_GREEN_HOST)
        .ok_or(EdgeError::MissingHeader(X_BLUE_GREEN_HOST))?;

    tracing::info!(status, host = %host, uri = %request.uri, "Serving index document for missing object");

    let document = fetcher.fetch_index(host).await?;

    // Only status, content type and body change. Every other origin header,
    // `content-encoding` and `etag` included, reaches the viewer as sent.
    response.set_status(200, "OK");
    response.headers.set("Content-Type", "text/html");
    response.set_body_bytes(document);

    Ok(response)
}
