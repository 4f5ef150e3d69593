//! Tag-keyed query cache with invalidate-then-refetch consistency.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

/// Tag under which the book list is cached.
pub const BOOKS_QUERY: &str = "books";

/// Most recent successful result per tag. Mutations never patch entries; they
/// invalidate the tag so the next read goes back to the server.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, tag: &str) -> Option<V> {
        self.entries.read().await.get(tag).cloned()
    }

    pub async fn contains(&self, tag: &str) -> bool {
        self.entries.read().await.contains_key(tag)
    }

    pub async fn set(&self, tag: &str, value: V) {
        self.entries.write().await.insert(tag.to_string(), value);
    }

    /// Drop the entry for `tag`. Returns whether anything was cached.
    pub async fn invalidate(&self, tag: &str) -> bool {
        let removed = self.entries.write().await.remove(tag).is_some();
        tracing::debug!(tag, removed, "query invalidated");
        removed
    }

    /// Serve `tag` from the cache, or run `fetch` and cache its success.
    /// Failures are not cached. The lock is not held while fetching.
    pub async fn fetch_with<F, Fut, E>(&self, tag: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(tag).await {
            tracing::trace!(tag, "query cache hit");
            return Ok(value);
        }

        tracing::debug!(tag, "query cache miss, fetching");
        let value = fetch().await?;
        self.set(tag, value.clone()).await;
        Ok(value)
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
