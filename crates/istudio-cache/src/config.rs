//! Cache configuration.
//!
//! # Environment Variables
//!
//! - `CACHE_TTL_SECONDS`: Default TTL for cached items in seconds (default: `300`)
//! - `CACHE_PREFIX`: Prefix for all cache keys (default: `istudio`)

use std::env;

/// Cache configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Default time-to-live for cached items in seconds.
    pub default_ttl_seconds: u64,

    /// Prefix for all cache keys to avoid collisions.
    pub key_prefix: String,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "istudio".into()),
        }
    }

    /// Build a prefixed cache key.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 300,
            key_prefix: "istudio".into(),
        }
    }
}
