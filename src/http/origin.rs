//! Origin forwarding.
//!
//! # Responsibilities
//! - Build the upstream request from the rewritten origin-request record
//! - Send it to the configured endpoint with the bucket domain as Host
//! - Buffer the upstream response into an origin-response record

use axum::body::Body;
use axum::http::{header::HOST, HeaderName, HeaderValue, Method, Request};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::event;
use crate::http::response::from_origin_response;

/// Errors reaching the origin.
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("Invalid upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("Failed to read upstream body: {0}")]
    Body(#[from] axum::Error),
}

/// HTTP client bound to one origin endpoint.
#[derive(Clone)]
pub struct OriginClient {
    client: Client<HttpConnector, Body>,
    endpoint: String,
    max_body_bytes: usize,
}

impl OriginClient {
    pub fn new(endpoint: &str, max_body_bytes: usize) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .build(HttpConnector::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_body_bytes,
        }
    }

    /// Upstream URL: endpoint, origin path prefix, request URI, query string.
    pub fn upstream_uri(&self, request: &event::Request) -> String {
        let prefix = request.origin.as_ref().map(event::Origin::path).unwrap_or_default();
        let mut uri = format!("{}{}{}", self.endpoint, prefix, request.uri);
        if !request.querystring.is_empty() {
            uri.push('?');
            uri.push_str(&request.querystring);
        }
        uri
    }

    /// Forward the request and buffer the response.
    pub async fn fetch(&self, request: &event::Request) -> Result<event::Response, OriginError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| OriginError::InvalidMethod(request.method.clone()))?;
        let uri = self.upstream_uri(request);

        let mut builder = Request::builder().method(method).uri(&uri);
        if let Some(headers) = builder.headers_mut() {
            for (name, entry) in request.headers.iter() {
                if name == "host" {
                    continue;
                }
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(&entry.value),
                ) {
                    headers.append(name, value);
                }
            }
            let host = match &request.origin {
                Some(origin) => Some(origin.domain_name()),
                None => request.headers.first_value("host"),
            };
            if let Some(value) = host.and_then(|h| HeaderValue::from_str(h).ok()) {
                headers.insert(HOST, value);
            }
        }
        let upstream = builder.body(Body::empty())?;

        tracing::debug!(uri = %uri, "Forwarding to origin");

        let response: hyper::Response<Incoming> = self.client.request(upstream).await?;
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_bytes).await?;

        Ok(from_origin_response(parts.status, &parts.headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Headers, Origin, S3Origin};

    #[test]
    fn test_upstream_uri_uses_origin_path() {
        let client = OriginClient::new("http://127.0.0.1:9000/", 1024);
        let mut req = event::Request::get("bgdemo.s3.us-east-1.amazonaws.com", "/whale");
        req.querystring = "v=2".into();
        req.origin = Some(Origin::S3(S3Origin {
            auth_method: "origin-access-identity".into(),
            custom_headers: Headers::new(),
            domain_name: "bgdemo.s3.us-east-1.amazonaws.com".into(),
            path: "/green".into(),
            region: "us-east-1".into(),
        }));

        assert_eq!(client.upstream_uri(&req), "http://127.0.0.1:9000/green/whale?v=2");
    }

    #[test]
    fn test_upstream_uri_without_origin() {
        let client = OriginClient::new("http://127.0.0.1:9000", 1024);
        let req = event::Request::get("bgdemo.s3.us-east-1.amazonaws.com", "/index.html");
        assert_eq!(client.upstream_uri(&req), "http://127.0.0.1:9000/index.html");
    }

    #[tokio::test]
    async fn test_fetch_buffers_upstream_response() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 404 Not Found\r\nContent-Type: application/xml\r\nContent-Length: 8\r\nConnection: close\r\n\r\n<Error/>",
                )
                .await;
        });

        let client = OriginClient::new(&format!("http://{addr}"), 1024);
        let req = event::Request::get("bgdemo.s3.us-east-1.amazonaws.com", "/missing");
        let resp = client.fetch(&req).await.unwrap();

        assert_eq!(resp.status, "404");
        assert_eq!(resp.headers.first_value("content-type"), Some("application/xml"));
        assert_eq!(resp.body.as_deref(), Some("<Error/>"));
    }

    #[tokio::test]
    async fn test_unreachable_origin() {
        let client = OriginClient::new("http://127.0.0.1:1", 1024);
        let req = event::Request::get("bgdemo.s3.us-east-1.amazonaws.com", "/");
        assert!(matches!(client.fetch(&req).await, Err(OriginError::Upstream(_))));
    }
}
