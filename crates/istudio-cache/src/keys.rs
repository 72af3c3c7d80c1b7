//! Cache key generation and invalidation helpers.
//!
//! Keys are namespaced under a fixed prefix so a future move to a shared
//! cache backend does not collide with other tenants.

use uuid::Uuid;

use crate::MemoryCache;

/// Prefix for all cache keys.
const CACHE_PREFIX: &str = "istudio";

/// Builds a cache key with the standard prefix.
fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Cache keys for note-list data. The note cache is keyed by owner: one
/// entry per user holding that user's simple list snapshot.
pub mod notes {
    use super::*;

    /// Key for a user's simple note list.
    pub fn by_user(user_id: Uuid) -> String {
        build_key(&["notes", &user_id.to_string(), "list"])
    }

    /// Key for a user's filtered note list.
    pub fn list(user_id: Uuid, filters_hash: &str) -> String {
        build_key(&["notes", &user_id.to_string(), "list", filters_hash])
    }

    /// Prefix covering every cached note entry for a user.
    pub fn user_prefix(user_id: Uuid) -> String {
        build_key(&["notes", &user_id.to_string()])
    }
}

/// Generates a short, stable hash from filter parameters for cache key
/// uniqueness.
pub fn hash_filters<T: std::hash::Hash>(filters: &T) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// High-level invalidation helpers.
pub mod invalidate {
    use super::*;

    /// Invalidate every cached note entry for a user.
    ///
    /// Call this after creating, updating, or deleting one of their notes.
    pub async fn notes(cache: &MemoryCache, user_id: Uuid) -> u64 {
        cache.invalidate_prefix(&notes::user_prefix(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_note_key_generation() {
        let id = Uuid::nil();
        let key = notes::by_user(id);
        assert!(key.starts_with("istudio:notes:"));
        assert!(key.contains(&id.to_string()));
        assert!(key.starts_with(&notes::user_prefix(id)));
    }

    #[test]
    fn test_hash_filters_consistency() {
        let filters = ("pinned", 123, true);
        assert_eq!(hash_filters(&filters), hash_filters(&filters));
        assert_ne!(hash_filters(&filters), hash_filters(&("other", 1, false)));
    }

    #[tokio::test]
    async fn test_invalidate_notes_clears_all_user_entries() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        cache.set(&notes::by_user(user), &vec![1, 2]).await.unwrap();
        cache
            .set(&notes::list(user, "abcd"), &vec![1])
            .await
            .unwrap();
        cache.set(&notes::by_user(other), &vec![3]).await.unwrap();

        assert_eq!(invalidate::notes(&cache, user).await, 2);
        assert!(cache.exists(&notes::by_user(other)).await);
    }
}
