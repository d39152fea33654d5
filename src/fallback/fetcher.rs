//! Entry-document fetching.
//!
//! # Responsibilities
//! - Fetch `/index.html` from the viewer's original host
//! - Treat non-2xx answers as faults
//!
//! # Design Decisions
//! - No retry and, by default, no timeout
//! - Authority override keeps the original Host header so the edge that
//!   receives the fetch still classifies it the same way

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HOST;

use crate::config::FallbackConfig;
use crate::handlers::EdgeError;

/// Path of the single-page application's shell.
pub const INDEX_DOCUMENT: &str = "/index.html";

/// Source of the application shell served on missing objects.
#[async_trait]
pub trait IndexFetcher: Send + Sync {
    /// Fetch the entry document as served for `host`.
    async fn fetch_index(&self, host: &str) -> Result<Bytes, EdgeError>;
}

/// Fetches the entry document over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpIndexFetcher {
    client: reqwest::Client,
    scheme: String,
    authority: Option<String>,
}

impl HttpIndexFetcher {
    /// HTTPS fetcher with no timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme: "https".to_string(),
            authority: None,
        }
    }

    /// Build a fetcher from the emulator's fallback settings.
    pub fn from_config(config: &FallbackConfig) -> Result<Self, EdgeError> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            scheme: config.scheme.clone(),
            authority: config.authority.clone(),
        })
    }

    /// Use a preconfigured client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Send fetches to `authority` instead of resolving the viewer host.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// URL the entry document is requested from.
    pub fn index_url(&self, host: &str) -> String {
        let authority = self.authority.as_deref().unwrap_or(host);
        format!("{}://{}{}", self.scheme, authority, INDEX_DOCUMENT)
    }
}

impl Default for HttpIndexFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexFetcher for HttpIndexFetcher {
    async fn fetch_index(&self, host: &str) -> Result<Bytes, EdgeError> {
        let url = self.index_url(host);
        tracing::debug!(url = %url, host = %host, "Fetching fallback document");

        let mut request = self.client.get(&url);
        if self.authority.is_some() {
            request = request.header(HOST, host);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EdgeError::FallbackStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
