//! Cache domains and the `unity://<domain>/cached/<handle>` URIs that
//! point into them.

use crate::error::CompactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URI scheme used for every cached-data locator.
pub const SCHEME: &str = "unity";

/// A payload domain. Each domain has its own store; handles from one domain
/// never resolve in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Logs,
    Hierarchy,
    #[serde(rename = "gameobject")]
    GameObject,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Logs, Domain::Hierarchy, Domain::GameObject];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Logs => "logs",
            Domain::Hierarchy => "hierarchy",
            Domain::GameObject => "gameobject",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = CompactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CompactError::InvalidUri(format!("unknown cache domain '{s}'")))
    }
}

/// Deferred-access locator for a compacted payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheUri {
    pub domain: Domain,
    pub handle: String,
}

impl CacheUri {
    pub fn new(domain: Domain, handle: impl Into<String>) -> Self {
        Self {
            domain,
            handle: handle.into(),
        }
    }

    /// Parse `unity://<domain>/cached/<handle>`.
    pub fn parse(uri: &str) -> Result<Self, CompactError> {
        let invalid = || {
            CompactError::InvalidUri(format!(
                "'{uri}' (expected {SCHEME}://<domain>/cached/<handle>)"
            ))
        };

        let rest = uri
            .trim()
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(invalid)?;

        let mut parts = rest.splitn(3, '/');
        let domain = parts.next().ok_or_else(invalid)?;
        let marker = parts.next().ok_or_else(invalid)?;
        let handle = parts.next().ok_or_else(invalid)?;

        if marker != "cached" || handle.is_empty() || handle.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(domain.parse()?, handle))
    }
}

impl fmt::Display for CacheUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}://{}/cached/{}", self.domain, self.handle)
    }
}

impl FromStr for CacheUri {
    type Err = CompactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CacheUri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
