//! # Cache Module: Injected Key-Value Storage
//!
//! The dashboard remembers two things between renders: resolved display
//! names for builder addresses, and which notifications a builder has
//! already seen. Both go through an explicit [`KeyValueStore`] handed to
//! the component that needs it, never through ambient global state.
//!
//! ```text
//! mod.rs         : KeyValueStore trait, in-process MemoryStore
//! expiring.rs    : ExpiringCache (timestamped entries + TTL), NameCache
//! read_markers.rs: per-address "last read" notification markers
//! ```
//!
//! Like the calculator, nothing here reads the clock: every freshness
//! check takes `now` as an argument.

pub mod expiring;
pub mod read_markers;

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

pub use expiring::{CacheEntry, ExpiringCache, NameCache};
pub use read_markers::ReadMarkers;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from typed cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A value could not be encoded for storage.
    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// Outcome of a [`KeyValueStore::update`] decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Leave the current value (or absence) as it is.
    Keep,
    /// Store these bytes.
    Set(Vec<u8>),
    /// Remove the key.
    Remove,
}

/// Minimal byte-oriented store behind every cache.
///
/// Implementations must be safe to share between threads. Expiry is not
/// the store's concern; [`ExpiringCache`] layers it on top.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes for `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>);

    /// Removes `key`. Returns `true` if something was removed.
    fn invalidate(&self, key: &str) -> bool;

    /// Removes every key.
    fn clear(&self);

    /// Reads `key` and applies `decide`'s verdict as one atomic step: no
    /// other write to `key` can land between the read and the write.
    ///
    /// `decide` runs while the key is locked and must not call back into
    /// the store.
    fn update(&self, key: &str, decide: &mut dyn FnMut(Option<&[u8]>) -> Update);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn invalidate(&self, key: &str) -> bool {
        (**self).invalidate(key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn update(&self, key: &str, decide: &mut dyn FnMut(Option<&[u8]>) -> Update) {
        (**self).update(key, decide)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn update(&self, key: &str, decide: &mut dyn FnMut(Option<&[u8]>) -> Update) {
        // The entry guard holds the shard lock until the verdict is applied.
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let verdict = decide(Some(occupied.get().as_slice()));
                match verdict {
                    Update::Keep => {}
                    Update::Set(value) => {
                        occupied.insert(value);
                    }
                    Update::Remove => {
                        occupied.remove();
                    }
                }
            }
            Entry::Vacant(vacant) => {
                if let Update::Set(value) = decide(None) {
                    vacant.insert(value);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    /// A store where another writer gets in after every read: a pending
    /// write lands right after `get` observes the old value, or right
    /// before an `update` takes the key lock.
    pub(crate) struct RacingStore {
        inner: MemoryStore,
        pending: Mutex<Option<(String, Vec<u8>)>>,
    }

    impl RacingStore {
        pub(crate) fn new(inner: MemoryStore, key: &str, value: Vec<u8>) -> Self {
            Self {
                inner,
                pending: Mutex::new(Some((key.to_string(), value))),
            }
        }

        fn land_pending(&self) {
            if let Some((key, value)) = self.pending.lock().unwrap().take() {
                self.inner.set(&key, value);
            }
        }
    }

    impl KeyValueStore for RacingStore {
        fn get(&self, key: &str) -> Option<Vec<u8>> {
            let seen = self.inner.get(key);
            self.land_pending();
            seen
        }

        fn set(&self, key: &str, value: Vec<u8>) {
            self.inner.set(key, value)
        }

        fn invalidate(&self, key: &str) -> bool {
            self.inner.invalidate(key)
        }

        fn clear(&self) {
            self.inner.clear()
        }

        fn update(&self, key: &str, decide: &mut dyn FnMut(Option<&[u8]>) -> Update) {
            self.land_pending();
            self.inner.update(key, decide)
        }
    }

    #[test]
    fn set_get_invalidate() {
        let store = MemoryStore::new();
        assert!(store.get("a").is_none());

        store.set("a", b"one".to_vec());
        assert_eq!(store.get("a"), Some(b"one".to_vec()));

        store.set("a", b"two".to_vec());
        assert_eq!(store.get("a"), Some(b"two".to_vec()));

        assert!(store.invalidate("a"));
        assert!(!store.invalidate("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemoryStore::new();
        store.set("a", vec![1]);
        store.set("b", vec![2]);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn update_applies_each_verdict() {
        let store = MemoryStore::new();

        store.update("a", &mut |current| {
            assert!(current.is_none());
            Update::Set(vec![1])
        });
        assert_eq!(store.get("a"), Some(vec![1]));

        store.update("a", &mut |current| {
            assert_eq!(current, Some(&[1u8][..]));
            Update::Keep
        });
        assert_eq!(store.get("a"), Some(vec![1]));

        store.update("a", &mut |_| Update::Remove);
        assert!(store.is_empty());

        store.update("b", &mut |_| Update::Remove);
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.update("counter", &mut |current| {
                            let n = current.map_or(0, |raw| raw[0] as u32 * 256 + raw[1] as u32);
                            let next = n + 1;
                            Update::Set(vec![(next / 256) as u8, (next % 256) as u8])
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let raw = KeyValueStore::get(&store, "counter").unwrap();
        assert_eq!(raw[0] as u32 * 256 + raw[1] as u32, 800);
    }

    #[test]
    fn shared_store_across_threads() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.set(&format!("k{}", i), vec![i as u8]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 4);
        assert_eq!(KeyValueStore::get(&store, "k3"), Some(vec![3]));
    }
}
