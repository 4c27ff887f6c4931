//! Timestamped cache entries with a TTL.
//!
//! Each value is stored as JSON alongside the Unix second it was written.
//! A read at `now` treats the entry as stale once `now - stored_at >= ttl`
//! and drops it from the store. Entries stamped in the future (another
//! writer's clock ran ahead) count as fresh.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{CacheError, KeyValueStore, Update};
use crate::config::NAME_CACHE_TTL_SECS;

/// Stored form of a cached value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub value: V,
    /// Unix seconds at write time.
    pub stored_at: i64,
}

impl<V> CacheEntry<V> {
    /// `true` once the entry is at least `ttl_secs` old at `now`.
    pub fn is_expired(&self, now: i64, ttl_secs: u64) -> bool {
        let age = now as i128 - self.stored_at as i128;
        age >= ttl_secs as i128
    }
}

// ---------------------------------------------------------------------------
// ExpiringCache
// ---------------------------------------------------------------------------

/// Typed TTL cache over any [`KeyValueStore`], scoped to a key namespace so
/// several caches can share one store.
#[derive(Debug)]
pub struct ExpiringCache<S> {
    store: S,
    namespace: &'static str,
    ttl_secs: u64,
}

impl<S: KeyValueStore> ExpiringCache<S> {
    pub fn new(store: S, namespace: &'static str, ttl_secs: u64) -> Self {
        Self {
            store,
            namespace,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Stores `value` stamped with `now`.
    pub fn put<V: Serialize>(&self, key: &str, value: &V, now: i64) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value,
            stored_at: now,
        };
        self.store.set(&self.key(key), serde_json::to_vec(&entry)?);
        Ok(())
    }

    /// Returns the value for `key` if present and fresh at `now`.
    ///
    /// Stale or undecodable entries are invalidated and read as a miss. The
    /// freshness check and the removal are one [`KeyValueStore::update`],
    /// so an entry rewritten in the meantime is never dropped.
    pub fn get<V: DeserializeOwned>(&self, key: &str, now: i64) -> Option<V> {
        let full_key = self.key(key);
        let ttl_secs = self.ttl_secs;
        let mut hit = None;

        self.store.update(&full_key, &mut |current| {
            let Some(raw) = current else {
                return Update::Keep;
            };
            match serde_json::from_slice::<CacheEntry<V>>(raw) {
                Ok(entry) if entry.is_expired(now, ttl_secs) => {
                    trace!(key = %full_key, stored_at = entry.stored_at, now, "cache entry expired");
                    Update::Remove
                }
                Ok(entry) => {
                    hit = Some(entry.value);
                    Update::Keep
                }
                Err(err) => {
                    trace!(key = %full_key, error = %err, "dropping undecodable cache entry");
                    Update::Remove
                }
            }
        });

        hit
    }

    /// Removes `key`. Returns `true` if an entry existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.store.invalidate(&self.key(key))
    }
}

// ---------------------------------------------------------------------------
// NameCache
// ---------------------------------------------------------------------------

/// Address → display name lookups (ENS names resolved elsewhere).
///
/// Addresses are compared case-insensitively, as hex addresses are.
#[derive(Debug)]
pub struct NameCache<S> {
    inner: ExpiringCache<S>,
}

impl<S: KeyValueStore> NameCache<S> {
    /// A name cache with the default one-week TTL.
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, NAME_CACHE_TTL_SECS)
    }

    pub fn with_ttl(store: S, ttl_secs: u64) -> Self {
        Self {
            inner: ExpiringCache::new(store, "name", ttl_secs),
        }
    }

    /// Cached name for `address`, if fresh at `now`.
    ///
    /// `Some(None)` means "resolved, and the address has no name", which is
    /// cached too so unnamed addresses are not re-resolved on every render.
    pub fn lookup(&self, address: &str, now: i64) -> Option<Option<String>> {
        self.inner.get(&address.to_ascii_lowercase(), now)
    }

    /// Records the resolution result for `address` at `now`.
    pub fn remember(&self, address: &str, name: Option<&str>, now: i64) -> Result<(), CacheError> {
        self.inner.put(&address.to_ascii_lowercase(), &name, now)
    }

    pub fn forget(&self, address: &str) -> bool {
        self.inner.invalidate(&address.to_ascii_lowercase())
    }
}
