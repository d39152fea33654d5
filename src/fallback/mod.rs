//! Single-page-application fallback.
//!
//! # Data Flow
//! ```text
//! origin 403/404
//!     → x-blue-green-host (viewer's original host)
//!     → IndexFetcher::fetch_index(host)
//!     → GET <scheme>://<host>/index.html
//!     → bytes substituted as a 200 text/html body
//! ```

pub mod fetcher;

pub use fetcher::{HttpIndexFetcher, IndexFetcher, INDEX_DOCUMENT};
