//! Per-domain store ownership.

use super::{CacheStats, Clock, EphemeralStore, SystemClock};
use crate::locator::{CacheUri, Domain};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Sizes of every domain store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub logs: CacheStats,
    pub hierarchy: CacheStats,
    pub gameobject: CacheStats,
}

/// Owns one [`EphemeralStore`] per [`Domain`].
///
/// Built once at startup and shared via `Arc<CacheRegistry>` by the compact
/// tools (writers) and the read-back tool (reader). Locks are never held
/// across an `.await`.
#[derive(Debug)]
pub struct CacheRegistry {
    logs: Mutex<EphemeralStore<Vec<Value>>>,
    hierarchy: Mutex<EphemeralStore<Vec<Value>>>,
    gameobjects: Mutex<EphemeralStore<Value>>,
}

impl CacheRegistry {
    /// Registry on wall-clock time with `ttl` as every store's default TTL.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Registry whose stores share `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: Mutex::new(EphemeralStore::with_clock(ttl, clock.clone())),
            hierarchy: Mutex::new(EphemeralStore::with_clock(ttl, clock.clone())),
            gameobjects: Mutex::new(EphemeralStore::with_clock(ttl, clock)),
        }
    }

    /// TTL applied to entries stored without an explicit one.
    pub fn default_ttl(&self) -> Duration {
        self.logs().default_ttl()
    }

    pub fn logs(&self) -> MutexGuard<'_, EphemeralStore<Vec<Value>>> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hierarchy(&self) -> MutexGuard<'_, EphemeralStore<Vec<Value>>> {
        self.hierarchy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn gameobjects(&self) -> MutexGuard<'_, EphemeralStore<Value>> {
        self.gameobjects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Park a full log list under a fresh handle.
    pub fn cache_logs(&self, logs: Vec<Value>) -> CacheUri {
        let uri = fresh_uri(Domain::Logs);
        debug!("Caching {} log records at {uri}", logs.len());
        self.logs().put(uri.handle.clone(), logs);
        uri
    }

    /// Park a full hierarchy forest under a fresh handle.
    pub fn cache_hierarchy(&self, roots: Vec<Value>) -> CacheUri {
        let uri = fresh_uri(Domain::Hierarchy);
        debug!("Caching hierarchy with {} roots at {uri}", roots.len());
        self.hierarchy().put(uri.handle.clone(), roots);
        uri
    }

    /// Park a single GameObject payload under a fresh handle.
    pub fn cache_gameobject(&self, gameobject: Value) -> CacheUri {
        let uri = fresh_uri(Domain::GameObject);
        debug!("Caching GameObject at {uri}");
        self.gameobjects().put(uri.handle.clone(), gameobject);
        uri
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            logs: self.logs().stats(),
            hierarchy: self.hierarchy().stats(),
            gameobject: self.gameobjects().stats(),
        }
    }

    /// Empty one domain's store.
    pub fn clear(&self, domain: Domain) {
        match domain {
            Domain::Logs => self.logs().clear(),
            Domain::Hierarchy => self.hierarchy().clear(),
            Domain::GameObject => self.gameobjects().clear(),
        }
    }

    /// Empty every store.
    pub fn clear_all(&self) {
        for domain in Domain::ALL {
            self.clear(domain);
        }
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new(super::DEFAULT_TTL)
    }
}

fn fresh_uri(domain: Domain) -> CacheUri {
    CacheUri::new(domain, Uuid::new_v4().to_string())
}
