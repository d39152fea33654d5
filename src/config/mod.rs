//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → shared via Arc to the emulator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Interceptor constants (header names, suffix, auth method) are not
//!   configurable

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::EdgeConfig;
pub use schema::FallbackConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::OriginConfig;
