//! Request record and origin descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::headers::Headers;

/// The in-flight request as the platform hands it to an interceptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub querystring: String,

    #[serde(default = "default_uri")]
    pub uri: String,

    /// Present only at the origin-facing stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_uri() -> String {
    "/".to_string()
}

impl Request {
    /// Build a bare GET request for `uri` carrying a `Host` header.
    pub fn get(host: &str, uri: &str) -> Self {
        let mut headers = Headers::new();
        headers.set("Host", host);
        Self {
            client_ip: None,
            headers,
            method: default_method(),
            querystring: String::new(),
            uri: uri.to_string(),
            origin: None,
        }
    }
}

/// Where the platform forwards a cache miss.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    S3(S3Origin),
    Custom(CustomOrigin),
}

impl Origin {
    /// Path prefix prepended to the request URI at the origin.
    pub fn path(&self) -> &str {
        match self {
            Origin::S3(s3) => &s3.path,
            Origin::Custom(custom) => &custom.path,
        }
    }

    pub fn domain_name(&self) -> &str {
        match self {
            Origin::S3(s3) => &s3.domain_name,
            Origin::Custom(custom) => &custom.domain_name,
        }
    }
}

/// Storage-bucket origin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Origin {
    pub auth_method: String,

    #[serde(default)]
    pub custom_headers: Headers,

    pub domain_name: String,

    #[serde(default)]
    pub path: String,

    pub region: String,
}

/// Arbitrary HTTP origin. Fields the crate does not interpret are kept as-is.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrigin {
    #[serde(default)]
    pub custom_headers: Headers,

    pub domain_name: String,

    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
