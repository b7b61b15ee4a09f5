//! TTL Cache Module
//!
//! Expiring cache: lazy expiry checks on every read keep results correct,
//! a background sweeper bounds how long expired entries stay resident.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::cache::{CacheStats, TtlEntry};
use crate::config::TtlConfig;
use crate::error::Result;
use crate::tasks::Sweeper;

/// State guarded by the cache lock. Shared with the sweeper thread.
struct TtlStore<K, V> {
    entries: HashMap<K, TtlEntry<V>>,
    stats: CacheStats,
}

impl<K, V> TtlStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    /// Removes up to `limit` entries expired at `now`, returns how many.
    fn remove_expired_batch(&mut self, now: Instant, limit: usize) -> usize {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .take(limit)
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }
}

/// Sweeps every entry expired at the start of the pass.
///
/// The lock is released between batches so foreground callers are never
/// blocked for more than one batch.
fn sweep_store<K, V>(store: &Mutex<TtlStore<K, V>>, batch_size: usize) -> usize
where
    K: Eq + Hash + Clone,
{
    let now = Instant::now();
    let mut removed = 0;

    loop {
        let batch = store.lock().remove_expired_batch(now, batch_size);
        removed += batch;
        if batch < batch_size {
            break;
        }
    }

    removed
}

// == TTL Cache ==
/// Thread-safe key-value cache whose entries expire after a per-entry TTL.
///
/// Construction starts a background sweeper thread; dropping the cache (or
/// calling [`TtlCache::shutdown`]) stops it.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memocache::TtlCache;
///
/// let cache = TtlCache::new();
/// cache.set("two", 2, Duration::from_secs(10));
/// assert_eq!(cache.get("two"), Some(2));
///
/// cache.set("gone", 0, Duration::ZERO);
/// assert_eq!(cache.get("gone"), None);
/// ```
pub struct TtlCache<K, V> {
    store: Arc<Mutex<TtlStore<K, V>>>,
    config: TtlConfig,
    sweeper: Option<Sweeper>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates an empty cache with the default sweep configuration.
    ///
    /// If the sweeper thread cannot be spawned the cache still works:
    /// expired entries stay invisible to reads and are reclaimed on access
    /// or by [`TtlCache::sweep_expired`].
    pub fn new() -> Self {
        let config = TtlConfig::default();
        let store = Arc::new(Mutex::new(TtlStore::new()));

        let sweeper = match spawn_sweeper(&store, &config) {
            Ok(sweeper) => Some(sweeper),
            Err(err) => {
                error!("TTL cache running without background sweeper: {}", err);
                None
            }
        };

        Self {
            store,
            config,
            sweeper,
        }
    }

    /// Creates an empty cache with a validated custom configuration.
    pub fn with_config(config: TtlConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(Mutex::new(TtlStore::new()));
        let sweeper = spawn_sweeper(&store, &config)?;

        Ok(Self {
            store,
            config,
            sweeper: Some(sweeper),
        })
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any previous entry and its expiration. A zero TTL stores
    /// an already expired entry, which no read will ever return.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        if ttl.is_zero() {
            debug!("Storing pre-expired entry (zero TTL)");
        }

        let entry = TtlEntry::new(value, ttl, Instant::now());
        self.store.lock().entries.insert(key, entry);
    }

    // == Get ==
    /// Returns a copy of the live value stored under `key`.
    ///
    /// Expired entries are reported as absent and removed on the spot.
    /// Reading never extends the TTL.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let now = Instant::now();
        let mut store = self.store.lock();

        let live = store.entries.get(key).map(|entry| !entry.is_expired_at(now));
        let value = match live {
            Some(true) => store.entries.get(key).map(|entry| entry.value.clone()),
            Some(false) => {
                store.entries.remove(key);
                store.stats.record_expirations(1);
                debug!("Lazily removed expired entry on get");
                None
            }
            None => None,
        };

        store.stats.record_lookup(value.is_some());
        value
    }

    // == Pop ==
    /// Removes `key` and returns its value if the entry was still live.
    pub fn pop<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let mut store = self.store.lock();

        let value = match store.entries.remove(key) {
            Some(entry) if !entry.is_expired_at(now) => Some(entry.value),
            Some(_) => {
                store.stats.record_expirations(1);
                debug!("Lazily removed expired entry on pop");
                None
            }
            None => None,
        };

        store.stats.record_lookup(value.is_some());
        value
    }

    // == Remove ==
    /// Deletes `key` regardless of its expiration state.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().entries.remove(key);
    }

    /// Returns true if `key` holds a live entry.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.store
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Returns how long the live entry under `key` has left.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.store
            .lock()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Sweep Expired ==
    /// Physically removes every expired entry, returns the count.
    pub fn sweep_expired(&self) -> usize {
        sweep_store(&self.store, self.config.sweep_batch_size)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.store.lock().entries.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let store = self.store.lock();
        let mut stats = store.stats.clone();
        stats.set_total_entries(store.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones that
    /// have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().entries.is_empty()
    }

    pub fn config(&self) -> &TtlConfig {
        &self.config
    }

    /// Returns true while the background sweeper is alive.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|s| !s.is_finished())
    }

    /// Stops the background sweeper and waits for it to exit.
    pub fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.stop();
        }
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.store.lock().entries.len())
            .field("config", &self.config)
            .field("sweeper", &self.sweeper.is_some())
            .finish()
    }
}

/// Starts the sweeper on a weak reference to `store`, so the thread never
/// keeps the cache state alive on its own.
fn spawn_sweeper<K, V>(store: &Arc<Mutex<TtlStore<K, V>>>, config: &TtlConfig) -> Result<Sweeper>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    let weak: Weak<Mutex<TtlStore<K, V>>> = Arc::downgrade(store);
    let batch_size = config.sweep_batch_size;

    let sweeper = Sweeper::spawn("ttl-sweeper", config.sweep_interval, move || {
        let Some(store) = weak.upgrade() else {
            return false;
        };

        let removed = sweep_store(&store, batch_size);
        if removed > 0 {
            info!("TTL sweep: removed {} expired entries", removed);
        } else {
            debug!("TTL sweep: no expired entries found");
        }
        true
    })?;

    Ok(sweeper)
}
