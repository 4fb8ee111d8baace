//! Expiring in-memory stores for compacted payloads.
//!
//! A compacted response carries a handle instead of the full payload; the
//! payload itself is parked here until the client reads it back or the
//! entry's TTL runs out. Expiry is lazy: every [`put`](EphemeralStore::put),
//! [`get`](EphemeralStore::get) and [`stats`](EphemeralStore::stats) call
//! prunes expired entries first, so no background task is needed.

mod registry;

pub use registry::{CacheRegistry, RegistryStats};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Default time-to-live for cached payloads (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

// ── Clock ──────────────────────────────────────────────────────────

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Share it via `Arc` between a store
/// and the test driving it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = add_ttl(*now, by);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── EphemeralStore ─────────────────────────────────────────────────

/// A cached value and its lifetime. Never mutated after insertion.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Store size snapshot, taken after pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
}

/// Identifier-keyed store whose entries disappear after a TTL.
///
/// One instance per domain. Identifiers are opaque and only meaningful
/// within the store that issued them. An entry is expired from the instant
/// `now >= expires_at`.
pub struct EphemeralStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V> fmt::Debug for EphemeralStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralStore")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<V> EphemeralStore<V> {
    /// Create an empty store using wall-clock time and [`DEFAULT_TTL`].
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Create an empty store with a custom default TTL and clock.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
        }
    }

    /// The TTL applied by [`put`](Self::put).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value` under `id` with the default TTL. Replaces any
    /// existing entry for `id`.
    pub fn put(&mut self, id: impl Into<String>, value: V) {
        self.put_with_ttl(id, value, self.default_ttl);
    }

    /// Store `value` under `id`, expiring `ttl` from now.
    pub fn put_with_ttl(&mut self, id: impl Into<String>, value: V, ttl: Duration) {
        let now = self.clock.now();
        self.prune_expired(now);
        self.entries.insert(
            id.into(),
            CacheEntry {
                value,
                created_at: now,
                expires_at: add_ttl(now, ttl),
            },
        );
    }

    /// Look up an unexpired entry.
    pub fn get(&mut self, id: &str) -> Option<&V> {
        let now = self.clock.now();
        self.prune_expired(now);
        // Anything still present survived the prune at `now`.
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Whether `id` resolves to an unexpired entry.
    pub fn has(&mut self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// How long ago an unexpired entry was stored.
    pub fn age(&mut self, id: &str) -> Option<TimeDelta> {
        let now = self.clock.now();
        self.prune_expired(now);
        self.entries.get(id).map(|entry| now - entry.created_at)
    }

    /// Remove `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of unexpired entries.
    pub fn stats(&mut self) -> CacheStats {
        let now = self.clock.now();
        self.prune_expired(now);
        CacheStats {
            size: self.entries.len(),
        }
    }

    fn prune_expired(&mut self, now: DateTime<Utc>) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!("Pruned {pruned} expired cache entries ({} left)", self.entries.len());
        }
    }
}

impl<V> Default for EphemeralStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// `now + ttl`, saturating at the latest representable instant.
fn add_ttl(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_store(ttl: Duration) -> (EphemeralStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = EphemeralStore::with_clock(ttl, clock.clone());
        (store, clock)
    }

    #[test]
    fn put_and_get() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        store.put("a", "payload".to_string());

        assert_eq!(store.get("a").map(String::as_str), Some("payload"));
        assert!(store.has("a"));
        assert_eq!(store.stats().size, 1);
    }

    #[test]
    fn unknown_id_is_absent() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        assert!(store.get("missing").is_none());
        assert!(!store.has("missing"));
    }

    #[test]
    fn put_overwrites_existing_id() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        store.put("a", "first".to_string());
        store.put("a", "second".to_string());

        assert_eq!(store.get("a").map(String::as_str), Some("second"));
        assert_eq!(store.stats().size, 1);
    }

    #[test]
    fn entry_resolves_until_just_before_expiry() {
        let (mut store, clock) = manual_store(Duration::from_secs(60));
        store.put("a", "x".to_string());

        clock.advance(Duration::from_secs(59));
        assert!(store.has("a"));
    }

    #[test]
    fn entry_is_expired_exactly_at_expires_at() {
        let (mut store, clock) = manual_store(Duration::from_secs(60));
        store.put("a", "x".to_string());

        clock.advance(Duration::from_secs(60));
        assert!(store.get("a").is_none());
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn expired_entry_is_not_resurrected() {
        let (mut store, clock) = manual_store(Duration::from_secs(10));
        let start = clock.now();
        store.put("a", "x".to_string());

        clock.advance(Duration::from_secs(30));
        assert!(!store.has("a"));

        // Rewinding the clock must not bring the pruned entry back.
        clock.set(start);
        assert!(!store.has("a"));
    }

    #[test]
    fn per_entry_ttl_overrides_default() {
        let (mut store, clock) = manual_store(Duration::from_secs(600));
        store.put_with_ttl("short", "x".to_string(), Duration::from_secs(5));
        store.put("long", "y".to_string());

        clock.advance(Duration::from_secs(6));
        assert!(!store.has("short"));
        assert!(store.has("long"));
    }

    #[test]
    fn put_prunes_expired_entries() {
        let (mut store, clock) = manual_store(Duration::from_secs(10));
        store.put("old", "x".to_string());
        clock.advance(Duration::from_secs(11));
        store.put("new", "y".to_string());

        assert_eq!(store.stats().size, 1);
    }

    #[test]
    fn delete_is_unconditional() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        store.put("a", "x".to_string());
        store.delete("a");
        store.delete("never-existed");

        assert!(!store.has("a"));
    }

    #[test]
    fn clear_empties_every_key() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        store.put("a", "x".to_string());
        store.put("b", "y".to_string());
        store.clear();

        assert!(!store.has("a"));
        assert!(!store.has("b"));
        assert_eq!(store.stats(), CacheStats { size: 0 });
    }

    #[test]
    fn age_tracks_creation_time() {
        let (mut store, clock) = manual_store(DEFAULT_TTL);
        store.put("a", "x".to_string());
        clock.advance(Duration::from_secs(90));

        assert_eq!(store.age("a"), Some(TimeDelta::seconds(90)));
        assert_eq!(store.age("b"), None);
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let (mut store, _clock) = manual_store(DEFAULT_TTL);
        store.put_with_ttl("a", "x".to_string(), Duration::MAX);
        assert!(store.has("a"));
    }
}
