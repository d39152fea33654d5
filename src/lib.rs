//! Blue/green edge interceptors and a local edge emulator.

pub mod config;
pub mod event;
pub mod fallback;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use handlers::EdgeError;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
pub use routing::Deployment;
