//! # iStudio Cache
//!
//! Process-wide in-memory TTL cache for the iStudio API.
//!
//! This crate provides:
//! - An in-memory cache with per-entry TTL (default 5 minutes)
//! - Cache operations (get, set, invalidate, invalidate by prefix)
//! - Cache configuration from environment variables
//! - Cache key generation utilities
//!
//! The cache holds per-user note list snapshots. Every successful note
//! mutation invalidates that user's entry, so a simple list read never
//! serves pre-mutation data. Entries are JSON-serialized so the cache is
//! shape-agnostic, the same way a networked cache would be.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use istudio_cache::{CacheConfig, MemoryCache};
//!
//! let config = CacheConfig::from_env();
//! let cache = MemoryCache::new(Duration::from_secs(config.default_ttl_seconds));
//!
//! cache.set("key", &my_value).await.unwrap();
//! let value: Option<MyType> = cache.get("key").await;
//! ```

pub mod config;
pub mod keys;
pub mod memory;

pub use config::CacheConfig;
pub use keys::hash_filters;
pub use memory::{CacheError, MemoryCache};
