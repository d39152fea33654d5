//! Interceptor fault taxonomy.

use thiserror::Error;

/// Faults an interceptor surfaces to the hosting platform.
///
/// None of these are retried. The platform answers the viewer with its own
/// error page.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// A header the interceptor cannot work without is absent.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// Host has too few labels to carry a region.
    #[error("Malformed origin host, cannot extract region: {0}")]
    MalformedHost(String),

    /// Routing context header holds something other than blue/green.
    #[error("Invalid blue/green context: {0}")]
    InvalidContext(String),

    /// Response status is not an integer.
    #[error("Invalid response status: {0}")]
    InvalidStatus(String),

    /// Fallback document request failed in transport.
    #[error("Fallback fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Fallback document request returned a non-success status.
    #[error("Fallback fetch of {url} returned status {status}")]
    FallbackStatus { url: String, status: u16 },

    /// Event document carries no records.
    #[error("Event contains no records")]
    EmptyEvent,

    /// Response-stage event carries no response.
    #[error("Event record has no response")]
    MissingResponse,
}
