//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptors and emulator produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the emulator as x-request-id
//! - Metrics are cheap (atomic increments) and a no-op until installed

pub mod logging;
pub mod metrics;
