//! Cache Store Module
//!
//! Long-lived cache: a HashMap behind a single lock, no expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats};

/// State guarded by the cache lock.
struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    stats: CacheStats,
}

// == Cache ==
/// Thread-safe key-value cache without expiration.
///
/// All operations take `&self`; share across threads with `Arc<Cache<K, V>>`.
///
/// # Example
/// ```
/// use memocache::Cache;
///
/// let cache = Cache::new();
/// cache.set("one", 1);
/// assert_eq!(cache.get("one"), Some(1));
/// assert_eq!(cache.pop("one"), Some(1));
/// assert_eq!(cache.get("one"), None);
/// ```
pub struct Cache<K, V> {
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            }),
        }
    }

    // == Set ==
    /// Inserts or overwrites the value stored under `key`.
    pub fn set(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        inner.entries.insert(key, CacheEntry::new(value));
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut inner = self.inner.lock();
        let value = inner.entries.get(key).map(|entry| entry.value.clone());
        inner.stats.record_lookup(value.is_some());
        value
    }

    // == Pop ==
    /// Removes and returns the value stored under `key` in one step.
    pub fn pop<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        let value = inner.entries.remove(key).map(|entry| entry.value);
        inner.stats.record_lookup(value.is_some());
        value
    }

    // == Remove ==
    /// Deletes `key`; does nothing when it is absent.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().entries.remove(key);
    }

    /// Returns true if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().entries.contains_key(key)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("len", &self.inner.lock().entries.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cache_new() {
        let cache: Cache<String, i32> = Cache::new();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_set_and_get() {
        let cache = Cache::new();

        cache.set("key1".to_string(), "value1".to_string());

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_get_nonexistent() {
        let cache: Cache<String, i32> = Cache::new();
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = Cache::new();

        cache.set("key1", 1);
        cache.set("key1", 2);

        assert_eq!(cache.get("key1"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_pop() {
        let cache = Cache::new();
        cache.set("three", 3);

        assert_eq!(cache.pop("three"), Some(3));
        assert_eq!(cache.get("three"), None);
        assert_eq!(cache.pop("three"), None);
    }

    #[test]
    fn test_cache_remove_is_idempotent() {
        let cache = Cache::new();
        cache.set("one", 1);
        cache.set("two", 2);

        cache.remove("one");
        cache.remove("one");
        cache.remove("never-set");

        assert_eq!(cache.get("one"), None);
        assert_eq!(cache.get("two"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pop_does_not_require_clone() {
        struct Handle(u32);

        let cache = Cache::new();
        cache.set(1u8, Handle(7));

        let popped = cache.pop(&1).map(|h| h.0);
        assert_eq!(popped, Some(7));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_contains_and_clear() {
        let cache = Cache::new();
        cache.set("a", 1);
        cache.set("b", 2);

        assert!(cache.contains_key("a"));
        cache.clear();
        assert!(!cache.contains_key("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_stats() {
        let cache = Cache::new();

        cache.set("key1", 1);
        cache.get("key1"); // hit
        cache.get("nonexistent"); // miss
        cache.pop("key1"); // hit

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_concurrent_set_same_key() {
        let cache = Arc::new(Cache::new());

        let handles: Vec<_> = (0..16u32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.set("k", i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = cache.get("k").unwrap();
        assert!(value < 16);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_pop_hands_out_once() {
        let cache = Arc::new(Cache::new());
        cache.set("token", 42);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.pop("token"))
            })
            .collect();
        let winners = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();

        assert_eq!(winners, 1);
    }
}
