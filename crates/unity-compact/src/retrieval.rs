//! Resolving a `unity://<domain>/cached/<handle>` URI back to the payload
//! that was parked when a compact operation ran.

use crate::error::CompactError;
use crate::locator::{CacheUri, Domain};
use crate::store::CacheRegistry;
use serde_json::Value;
use tracing::debug;

/// Outcome of a cache read-back. `Missing` covers both ids that were never
/// stored and entries that have expired.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    Missing,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::Missing => None,
        }
    }
}

impl CacheRegistry {
    /// Look `uri` up in its domain's store.
    pub fn lookup(&self, uri: &CacheUri) -> Lookup {
        let handle = uri.handle.as_str();
        let found = match uri.domain {
            Domain::Logs => {
                let mut store = self.logs();
                log_age(uri, store.age(handle));
                store.get(handle).cloned().map(Value::Array)
            }
            Domain::Hierarchy => {
                let mut store = self.hierarchy();
                log_age(uri, store.age(handle));
                store.get(handle).cloned().map(Value::Array)
            }
            Domain::GameObject => {
                let mut store = self.gameobjects();
                log_age(uri, store.age(handle));
                store.get(handle).cloned()
            }
        };

        match found {
            Some(value) => Lookup::Found(value),
            None => {
                debug!("Cache miss for {uri}");
                Lookup::Missing
            }
        }
    }

    /// Parse `uri` and look it up. A malformed URI is an error; a
    /// well-formed one that resolves to nothing is `Ok(Lookup::Missing)`.
    pub fn resolve(&self, uri: &str) -> Result<Lookup, CompactError> {
        let uri = CacheUri::parse(uri)?;
        Ok(self.lookup(&uri))
    }
}

fn log_age(uri: &CacheUri, age: Option<chrono::TimeDelta>) {
    if let Some(age) = age {
        debug!("Cache hit for {uri} (age {}s)", age.num_seconds());
    }
}
