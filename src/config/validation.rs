//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//! - Reject an origin domain the rewriter could never extract a region from
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::EdgeConfig;
use crate::routing::region_of;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    if region_of(&config.origin.domain_name).is_none() {
        errors.push(ValidationError::new(
            "origin.domain_name",
            format!(
                "needs at least three labels to carry a region: {}",
                config.origin.domain_name
            ),
        ));
    }

    match Url::parse(&config.origin.endpoint) {
        Ok(url) if url.scheme() == "http" && url.host().is_some() => {}
        Ok(url) => errors.push(ValidationError::new(
            "origin.endpoint",
            format!("must be an http URL with a host, got scheme {}", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("origin.endpoint", e.to_string())),
    }

    if !matches!(config.fallback.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::new(
            "fallback.scheme",
            format!("must be http or https, got {}", config.fallback.scheme),
        ));
    }

    if let Some(authority) = &config.fallback.authority {
        if authority.is_empty() || authority.contains('/') {
            errors.push(ValidationError::new(
                "fallback.authority",
                format!("must be host[:port], got {authority}"),
            ));
        }
    }

    if config.fallback.timeout_secs == Some(0) {
        errors.push(ValidationError::new("fallback.timeout_secs", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "not a socket address: {}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
