//! In-memory query cache with namespace invalidation.
//!
//! Responses are cached under an enumerated key so invalidation rules get
//! compile-time exhaustiveness instead of stringly-typed prefixes. Values
//! are stored as serialized JSON and deserialized on read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use docshelf_api::{DocumentId, Parent};
use docshelf_common::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Cache key for one remote query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Children listing of a folder (or the root).
    Children(Parent),
    /// Raw text content of a document.
    Content(DocumentId),
    /// Whole-corpus relationship snapshot.
    Graph,
}

impl CacheKey {
    /// The namespace this key belongs to, for coarse invalidation.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::Children(_) => Namespace::Documents,
            Self::Content(_) => Namespace::Content,
            Self::Graph => Namespace::Graph,
        }
    }
}

/// Invalidation namespace.
///
/// Mutations evict whole namespaces rather than tracking fine-grained
/// dependencies; any create/move/delete/upload plausibly affects every
/// listing, so the entire `Documents` namespace goes at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Children listings.
    Documents,
    /// Document text content.
    Content,
    /// Relationship graph snapshot.
    Graph,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    cached_at: DateTime<Utc>,
}

/// Keyed cache of server responses.
///
/// Not a persistence layer: state lives only in memory and is dropped with
/// the cache. Safe for concurrent use; the lock is never held across a
/// network call.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached response.
    ///
    /// Returns `Ok(Some(value))` on a hit, `Ok(None)` on a miss.
    pub async fn get<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let entries = self.entries.read().await;

        if let Some(entry) = entries.get(key) {
            let value: T = serde_json::from_value(entry.value.clone())
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            debug!(key = ?key, cached_at = %entry.cached_at, "Cache hit");
            Ok(Some(value))
        } else {
            debug!(key = ?key, "Cache miss");
            Ok(None)
        }
    }

    /// Store a response.
    pub async fn put<T: Serialize>(&self, key: CacheKey, value: &T) -> AppResult<()> {
        let value =
            serde_json::to_value(value).map_err(|e| AppError::Serialization(e.to_string()))?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                cached_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Evict a single key.
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            debug!(key = ?key, "Invalidated cache entry");
        }
    }

    /// Evict every key in a namespace. Returns the number of evicted entries.
    pub async fn invalidate_namespace(&self, namespace: Namespace) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.namespace() != namespace);
        let evicted = before - entries.len();

        if evicted > 0 {
            info!(namespace = ?namespace, evicted, "Invalidated cache namespace");
        }
        evicted
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let cache = QueryCache::new();
        let key = CacheKey::Children(Parent::Root);

        cache
            .put(key, &vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let hit: Option<Vec<String>> = cache.get(&key).await.unwrap();
        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let cache = QueryCache::new();
        let hit: Option<Vec<String>> = cache.get(&CacheKey::Content(1)).await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_namespace_eviction_is_exact() {
        let cache = QueryCache::new();
        cache
            .put(CacheKey::Children(Parent::Root), &Vec::<String>::new())
            .await
            .unwrap();
        cache
            .put(CacheKey::Children(Parent::Folder(3)), &Vec::<String>::new())
            .await
            .unwrap();
        cache.put(CacheKey::Graph, &"snapshot").await.unwrap();

        let evicted = cache.invalidate_namespace(Namespace::Documents).await;
        assert_eq!(evicted, 2);

        // The graph entry survives a documents invalidation.
        let graph: Option<String> = cache.get(&CacheKey::Graph).await.unwrap();
        assert_eq!(graph.as_deref(), Some("snapshot"));

        let children: Option<Vec<String>> =
            cache.get(&CacheKey::Children(Parent::Root)).await.unwrap();
        assert!(children.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_single_key() {
        let cache = QueryCache::new();
        cache.put(CacheKey::Content(7), &"text").await.unwrap();
        cache.put(CacheKey::Content(8), &"other").await.unwrap();

        cache.invalidate(&CacheKey::Content(7)).await;

        assert!(cache.get::<String>(&CacheKey::Content(7)).await.unwrap().is_none());
        assert!(cache.get::<String>(&CacheKey::Content(8)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let cache = QueryCache::new();
        cache.put(CacheKey::Graph, &1).await.unwrap();
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
