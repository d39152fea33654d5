//! HTTP edge emulator subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → request.rs (HTTP request → viewer-request record)
//!     → handlers::classify
//!     → request.rs (attach bucket origin, Host = bucket domain)
//!     → handlers::rewrite
//!     → origin.rs (forward to <endpoint><origin path><uri>)
//!     → response.rs (HTTP response → origin-response record)
//!     → handlers::fallback
//!     → response.rs (record → HTTP response)
//!     → Send to viewer
//! ```

pub mod origin;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::EdgeServer;
