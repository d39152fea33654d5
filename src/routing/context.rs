//! Routing context derivation.
//!
//! # Responsibilities
//! - Classify a hostname as blue or green from its first label
//! - Extract the bucket region from a storage domain
//!
//! # Design Decisions
//! - Pure functions over `&str`; no header access here
//! - Case-sensitive suffix match, as the DNS names are provisioned lowercase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// First-label suffix that selects the candidate deployment.
pub const CANDIDATE_SUFFIX: &str = "-test";

/// One of the two parallel content sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Stable content.
    Blue,
    /// Candidate content.
    Green,
}

impl Deployment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Blue => "blue",
            Deployment::Green => "green",
        }
    }

    /// Origin path prefix serving this deployment.
    pub fn origin_path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Deployment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(Deployment::Blue),
            "green" => Ok(Deployment::Green),
            other => Err(other.to_string()),
        }
    }
}

/// Classify a viewer hostname.
pub fn classify_host(host: &str) -> Deployment {
    let subdomain = host.split('.').next().unwrap_or_default();
    if subdomain.ends_with(CANDIDATE_SUFFIX) {
        Deployment::Green
    } else {
        Deployment::Blue
    }
}

/// Third dot-delimited label of a storage domain, e.g. the region in
/// `bucket.s3.us-east-1.amazonaws.com`.
pub fn region_of(domain: &str) -> Option<&str> {
    domain.split('.').nth(2).filter(|label| !label.is_empty())
}
