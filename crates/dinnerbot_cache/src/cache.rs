//! TTL cache implementation.

use derive_getters::Getters;
use dinnerbot_error::{CacheError, CacheErrorKind};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entry holding a value and its insertion time.
///
/// `created_at` is stamped on insertion and immutable thereafter. Validity is
/// never stored; it is always recomputed from the entry's age.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: JsonValue,
    created_at: Instant,
}

impl CacheEntry {
    fn new(value: JsonValue) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }
}

/// Keyed store of JSON values, each valid for a fixed time window.
///
/// A key maps to at most one entry. Adding under a key whose entry is still
/// valid is a contract violation; adding over an expired entry silently
/// replaces it. Expired entries are only physically removed by [`tidy`],
/// never on read.
///
/// [`tidy`]: TtlCache::tidy
///
/// # Example
///
/// ```
/// use dinnerbot_cache::TtlCache;
/// use serde_json::json;
///
/// let mut cache = TtlCache::new(600);
/// cache.add("/shards/steam/players/abc", json!({"kills": 3})).unwrap();
///
/// let hit = cache.retrieve("/shards/steam/players/abc").unwrap();
/// assert_eq!(hit, Some(&json!({"kills": 3})));
/// ```
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    /// Create a cache whose entries are valid for `ttl_seconds`.
    ///
    /// The TTL is fixed for the cache's lifetime.
    pub fn new(ttl_seconds: u64) -> Self {
        tracing::debug!(ttl_seconds, "Creating new TtlCache");
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            entries: HashMap::new(),
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert a value under `key`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `InvalidKey` if `key` is empty or blank
    /// - `InvalidValue` if `value` is JSON null; a remote absence must be
    ///   stored as an explicit failure value, not as "nothing"
    /// - `KeyOccupied` if `key` already holds a still-valid entry; this
    ///   signals a caller bug (re-adding before expiry), not a miss path
    #[tracing::instrument(skip(self, value), fields(cache_size = self.entries.len()))]
    pub fn add(&mut self, key: &str, value: JsonValue) -> Result<(), CacheError> {
        if key.trim().is_empty() {
            return Err(CacheError::new(CacheErrorKind::InvalidKey));
        }
        if value.is_null() {
            return Err(CacheError::new(CacheErrorKind::InvalidValue));
        }
        if let Some(existing) = self.entries.get(key)
            && !self.is_expired(existing)
        {
            return Err(CacheError::new(CacheErrorKind::KeyOccupied(
                key.to_string(),
            )));
        }

        tracing::debug!(key, "Inserted entry into cache");
        self.entries.insert(key.to_string(), CacheEntry::new(value));
        Ok(())
    }

    /// Get the value stored under `key`, if present and still valid.
    ///
    /// Absent and expired entries both read as `Ok(None)`; a miss is a
    /// sentinel, not an error. Never mutates the cache (no evict-on-read).
    ///
    /// # Errors
    ///
    /// `InvalidKey` if `key` is empty or blank.
    pub fn retrieve(&self, key: &str) -> Result<Option<&JsonValue>, CacheError> {
        if key.trim().is_empty() {
            return Err(CacheError::new(CacheErrorKind::InvalidKey));
        }
        match self.entries.get(key) {
            Some(entry) if !self.is_expired(entry) => {
                tracing::debug!(key, "Cache hit");
                Ok(Some(entry.value()))
            }
            Some(_) => {
                tracing::debug!(key, "Cache entry expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Remove every expired entry. Returns the number removed.
    ///
    /// No-op on an empty cache; valid entries are never touched.
    pub fn tidy(&mut self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| !Self::expired_at(entry, now, ttl));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Swept expired cache entries"
            );
        }
        removed
    }

    /// Number of currently valid entries.
    ///
    /// Entries that have expired but not yet been swept by [`tidy`] are not
    /// counted.
    ///
    /// [`tidy`]: TtlCache::tidy
    pub fn count(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !Self::expired_at(entry, now, self.ttl))
            .count()
    }

    /// Whether `entry` has outlived this cache's TTL.
    ///
    /// Strict comparison: an entry whose age exactly equals the TTL is still
    /// valid.
    pub fn is_expired(&self, entry: &CacheEntry) -> bool {
        Self::expired_at(entry, Instant::now(), self.ttl)
    }

    fn expired_at(entry: &CacheEntry, now: Instant, ttl: Duration) -> bool {
        now.duration_since(entry.created_at) > ttl
    }
}
