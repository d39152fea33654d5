//! Blue/green routing decision.
//!
//! # Data Flow
//! ```text
//! viewer Host header
//!     → context.rs (first label, `-test` suffix)
//!     → Deployment::{Blue, Green}
//!     → written once as X_BLUE_GREEN_CONTEXT by the viewer stage
//!     → read (never recomputed) by the origin stages
//! ```
//!
//! # Design Decisions
//! - Deterministic: same host always yields the same deployment
//! - Decision travels in request headers, not shared state

pub mod context;

pub use context::{classify_host, region_of, Deployment};

/// Carries the viewer's original Host value.
pub const X_BLUE_GREEN_HOST: &str = "x-blue-green-host";

/// Carries the routing context (`blue` or `green`).
pub const X_BLUE_GREEN_CONTEXT: &str = "x-blue-green-context";
