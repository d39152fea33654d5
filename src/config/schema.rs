//! Configuration schema definitions.
//!
//! This module defines the configuration of the local edge emulator.
//! All types derive Serde traits for deserialization from config files.
//! The interceptors themselves take no configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge emulator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Storage origin the edge forwards cache misses to.
    pub origin: OriginConfig,

    /// Entry-document fallback settings.
    pub fallback: FallbackConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Storage origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Bucket domain, sent as the Host header at the origin stage.
    /// The region is read from its third label.
    pub domain_name: String,

    /// Address actually connected to (e.g., a local S3-compatible server).
    pub endpoint: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            domain_name: "bgdemo.s3.us-east-1.amazonaws.com".to_string(),
            endpoint: "http://127.0.0.1:9000".to_string(),
        }
    }
}

/// Fallback fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// URL scheme for the index fetch ("https" or "http").
    pub scheme: String,

    /// Fixed `host:port` to send index fetches to, keeping the viewer's Host.
    pub authority: Option<String>,

    /// Optional fetch timeout in seconds. Unbounded when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            authority: None,
            timeout_secs: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum origin response body buffered per request.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
