//! # Result Cache
//!
//! In-memory implementation of `ResultCache`. Providers receive it as an
//! injected collaborator so repeated queries within the TTL skip the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::traits::ResultCache;
use crate::domain::types::SearchResult;

struct Entry {
    value: Vec<SearchResult>,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        let mut entries = self.entries.lock().await;
        let fresh = entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone());
        if fresh.is_none() {
            entries.remove(key);
        }
        fresh
    }

    async fn set(&self, key: &str, value: Vec<SearchResult>, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("books:dune", vec![SearchResult::new("Dune")], Duration::from_secs(10))
            .await;

        let hit = cache.get("books:dune").await.unwrap();
        assert_eq!(hit[0].title, "Dune");

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(cache.get("books:dune").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set("a", Vec::new(), Duration::from_secs(5)).await;
        cache.set("b", Vec::new(), Duration::from_secs(50)).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.get("b").await.is_some());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("nothing").await.is_none());
    }
}
