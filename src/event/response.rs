//! Response record.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::event::headers::Headers;
use crate::handlers::EdgeError;

/// How `body` is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Text,
    Base64,
}

/// The origin's (or an interceptor's) response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Status code, string-encoded as the platform does.
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,
}

impl Response {
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            status_description: Some(description.into()),
            headers: Headers::new(),
            body: None,
            body_encoding: None,
        }
    }

    /// Status as an integer.
    pub fn status_code(&self) -> Result<u16, EdgeError> {
        self.status
            .trim()
            .parse()
            .map_err(|_| EdgeError::InvalidStatus(self.status.clone()))
    }

    pub fn set_status(&mut self, status: u16, description: impl Into<String>) {
        self.status = status.to_string();
        self.status_description = Some(description.into());
    }

    /// Store raw bytes, falling back to base64 when they are not UTF-8.
    pub fn set_body_bytes(&mut self, bytes: Bytes) {
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => {
                self.body = Some(text);
                self.body_encoding = Some(BodyEncoding::Text);
            }
            Err(_) => {
                self.body = Some(STANDARD.encode(&bytes));
                self.body_encoding = Some(BodyEncoding::Base64);
            }
        }
    }

    /// Decoded body bytes. An undecodable base64 body is treated as text.
    pub fn body_bytes(&self) -> Bytes {
        let Some(body) = &self.body else {
            return Bytes::new();
        };
        match self.body_encoding {
            Some(BodyEncoding::Base64) => match STANDARD.decode(body) {
                Ok(decoded) => Bytes::from(decoded),
                Err(e) => {
                    tracing::warn!(error = %e, "Response body is not valid base64, sending as text");
                    Bytes::from(body.clone())
                }
            },
            _ => Bytes::from(body.clone()),
        }
    }
}
