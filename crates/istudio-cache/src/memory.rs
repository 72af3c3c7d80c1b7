//! In-memory TTL cache.
//!
//! Values are stored JSON-serialized under string keys, each with its own
//! expiry deadline. Expired entries read as misses and are evicted when
//! touched. All mutation goes through an async `RwLock`; concurrent writes
//! to the same key are not reconciled, the last write observed wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Shared in-memory cache with per-entry TTL.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    default_ttl: Duration,
}

struct Entry {
    json: String,
    expires_at: Instant,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MemoryCache {
    /// Creates an empty cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Gets a cached value by key.
    ///
    /// Returns `None` on a miss, an expired entry (evicted in passing), or
    /// a deserialization failure.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    debug!(cache.key = %key, "Cache hit");
                    return match serde_json::from_str(&entry.json) {
                        Ok(parsed) => Some(parsed),
                        Err(e) => {
                            error!(cache.key = %key, error = %e, "Failed to deserialize cached value");
                            None
                        }
                    };
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.entries.write().await;
            // Re-check under the write lock; a newer set may have landed.
            if entries
                .get(key)
                .is_some_and(|entry| entry.expires_at <= Instant::now())
            {
                entries.remove(key);
                debug!(cache.key = %key, "Expired entry evicted");
            }
        } else {
            debug!(cache.key = %key, "Cache miss");
        }
        None
    }

    /// Sets a cached value with the default TTL.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Sets a cached value with a custom TTL.
    pub async fn set_with_ttl<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;
        let entry = Entry {
            json,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");

        Ok(())
    }

    /// Invalidates (removes) a cached key. Returns whether an entry was
    /// present.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            debug!(cache.key = %key, "Cache invalidated");
        }
        removed
    }

    /// Invalidates all keys starting with `prefix`. Returns the number of
    /// entries removed.
    pub async fn invalidate_prefix(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = (before - entries.len()) as u64;

        debug!(cache.prefix = %prefix, cache.removed = %removed, "Prefix invalidation complete");
        removed
    }

    /// Checks whether a live (unexpired) entry exists for `key`.
    pub async fn exists(&self, key: &str) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    /// Remaining TTL for a live entry, `None` when absent or expired.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        entry.expires_at.checked_duration_since(Instant::now())
    }

    /// Drops every expired entry. Returns the number removed.
    pub async fn purge_expired(&self) -> u64 {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        (before - entries.len()) as u64
    }
}
