//! Notification read markers.
//!
//! For each builder address we keep the timestamp of the newest
//! notification they have seen. Markers never expire and never move
//! backwards: marking an older notification as read is a no-op.

use super::{CacheError, KeyValueStore, Update};

const NAMESPACE: &str = "read";

/// Per-address "last read" timestamps over an injected store.
#[derive(Debug)]
pub struct ReadMarkers<S> {
    store: S,
}

impl<S: KeyValueStore> ReadMarkers<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(address: &str) -> String {
        format!("{}:{}", NAMESPACE, address.to_ascii_lowercase())
    }

    /// Timestamp of the newest notification `address` has read.
    pub fn last_read(&self, address: &str) -> Option<i64> {
        let raw = self.store.get(&Self::key(address))?;
        serde_json::from_slice(&raw).ok()
    }

    /// Marks everything up to `timestamp` as read and returns the marker in
    /// effect afterwards.
    ///
    /// The compare and the write happen under one [`KeyValueStore::update`],
    /// so a newer marker written concurrently is never overwritten.
    pub fn mark_read(&self, address: &str, timestamp: i64) -> Result<i64, CacheError> {
        let encoded = serde_json::to_vec(&timestamp)?;
        let mut marker = timestamp;
        self.store.update(&Self::key(address), &mut |current| {
            match current.and_then(|raw| serde_json::from_slice::<i64>(raw).ok()) {
                Some(existing) if existing >= timestamp => {
                    marker = existing;
                    Update::Keep
                }
                _ => {
                    marker = timestamp;
                    Update::Set(encoded.clone())
                }
            }
        });
        Ok(marker)
    }

    /// Counts notifications newer than the marker. With no marker, every
    /// notification is unread.
    pub fn unread_count<I>(&self, address: &str, timestamps: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        let marker = self.last_read(address);
        timestamps
            .into_iter()
            .filter(|ts| marker.map_or(true, |m| *ts > m))
            .count()
    }

    /// Forgets the marker for `address`.
    pub fn reset(&self, address: &str) -> bool {
        self.store.invalidate(&Self::key(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::RacingStore;
    use crate::cache::MemoryStore;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn no_marker_means_everything_unread() {
        let markers = ReadMarkers::new(MemoryStore::new());
        assert_eq!(markers.last_read("0x1"), None);
        assert_eq!(markers.unread_count("0x1", [10, 20, 30]), 3);
    }

    #[test]
    fn marker_counts_only_newer_notifications() {
        let markers = ReadMarkers::new(MemoryStore::new());
        markers.mark_read("0x1", 20).unwrap();
        assert_eq!(markers.unread_count("0x1", [10, 20, 30]), 1);
    }

    #[test]
    fn marker_never_moves_backwards() {
        let markers = ReadMarkers::new(MemoryStore::new());
        assert_eq!(markers.mark_read("0x1", 50).unwrap(), 50);
        assert_eq!(markers.mark_read("0x1", 10).unwrap(), 50);
        assert_eq!(markers.last_read("0x1"), Some(50));
        assert_eq!(markers.mark_read("0x1", 60).unwrap(), 60);
    }

    #[test]
    fn addresses_are_case_insensitive_and_independent() {
        let markers = ReadMarkers::new(MemoryStore::new());
        markers.mark_read("0xAB", 5).unwrap();
        assert_eq!(markers.last_read("0xab"), Some(5));
        assert_eq!(markers.last_read("0xcd"), None);
        assert!(markers.reset("0xab"));
        assert_eq!(markers.last_read("0xAB"), None);
    }

    #[test]
    fn newer_marker_written_mid_call_survives() {
        let inner = MemoryStore::new();
        inner.set("read:0x1", serde_json::to_vec(&40i64).unwrap());
        let store = RacingStore::new(inner, "read:0x1", serde_json::to_vec(&60i64).unwrap());
        let markers = ReadMarkers::new(store);

        assert_eq!(markers.mark_read("0x1", 50).unwrap(), 60);
        assert_eq!(markers.last_read("0x1"), Some(60));
    }

    #[test]
    fn concurrent_marks_keep_the_newest() {
        let markers = Arc::new(ReadMarkers::new(MemoryStore::new()));
        let handles: Vec<_> = (0..8i64)
            .map(|t| {
                let markers = Arc::clone(&markers);
                thread::spawn(move || {
                    for i in 0..200i64 {
                        markers.mark_read("0x1", (i * 8 + t) % 1_000).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(markers.last_read("0x1"), Some(999));
    }
}
