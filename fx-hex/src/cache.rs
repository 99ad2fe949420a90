//! In-memory snapshot cache with sliding and absolute expiry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Cached value plus its expiry bookkeeping.
#[derive(Debug)]
struct CacheEntry<T> {
    value: Arc<T>,
    created_at: Instant,
    last_access: Instant,
    absolute_expiry: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: Arc<T>, now: Instant, absolute: Duration) -> Self {
        Self {
            value,
            created_at: now,
            last_access: now,
            absolute_expiry: now + absolute,
        }
    }

    fn is_live(&self, now: Instant, sliding: Duration) -> bool {
        now < self.absolute_expiry && now.duration_since(self.last_access) < sliding
    }
}

/// Configuration for a snapshot cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry expires when not read for this long.
    pub sliding_expiry: Duration,
    /// Entry expires this long after creation regardless of reads.
    pub absolute_expiry: Duration,
    /// Maximum number of entries.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sliding_expiry: Duration::from_secs(30 * 60),
            absolute_expiry: Duration::from_secs(60 * 60),
            max_entries: 10_000,
        }
    }
}

/// Thread-safe cache of immutable values keyed by string.
///
/// Values are stored behind `Arc` and never mutated; a key is only ever
/// replaced as a whole. Expiry is checked lazily on access and by
/// [`SnapshotCache::evict_expired`].
pub struct SnapshotCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
    config: CacheConfig,
}

impl<T: Send + Sync + 'static> SnapshotCache<T> {
    /// Create a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the live value for `key`, refreshing its sliding window.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let now = Instant::now();
        let sliding = self.config.sliding_expiry;

        let expired = match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now, sliding) => {
                entry.last_access = now;
                debug!(key, "Cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(key, "Cache entry expired");
            self.entries
                .remove_if(key, |_, entry| !entry.is_live(now, sliding));
        }
        None
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: Arc<T>) {
        let key = key.into();

        if self.entries.len() >= self.config.max_entries && !self.entries.contains_key(&key) {
            self.evict_expired();
            if self.entries.len() >= self.config.max_entries {
                self.evict_oldest();
            }
        }

        let entry = CacheEntry::new(value, Instant::now(), self.config.absolute_expiry);
        self.entries.insert(key, entry);
    }

    /// Returns the live value for `key`, or runs `fetch` and caches its
    /// success.
    ///
    /// Failures are returned as-is and leave nothing behind, so the next call
    /// fetches again. Concurrent callers for the same cold key wait for the
    /// first fetch instead of issuing their own.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let slot = InflightSlot {
            inflight: &self.inflight,
            key,
            lock: self.inflight.entry(key.to_string()).or_default().clone(),
        };
        let _guard = slot.lock.lock().await;

        // Filled by a concurrent fetch while we waited.
        match self.get(key) {
            Some(value) => Ok(value),
            None => {
                debug!(key, "Cache miss, fetching");
                fetch().await.map(|value| {
                    let value = Arc::new(value);
                    self.insert(key, value.clone());
                    value
                })
            }
        }
    }

    /// Removes a single entry.
    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Clear all cached values.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let sliding = self.config.sliding_expiry;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now, sliding));
        before.saturating_sub(self.entries.len())
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.created_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            debug!(key = %key, "Evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }

    /// Get the number of entries in cache, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-key fetch lock, released from the map once no other caller holds it.
///
/// Cleanup runs on drop so a cancelled fetch does not leave its lock behind.
struct InflightSlot<'a> {
    inflight: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        // One reference in the map, one here.
        self.inflight
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) <= 2);
    }
}

impl<T: Send + Sync + 'static> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
