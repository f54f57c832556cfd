//! In-memory implementation of the cache store.
//!
//! Implements [`CacheStore`] with maps guarded by a `tokio::sync::RwLock`.
//! Exists for local development and tests, where no Redis is available.
//! Not durable; TTLs are accepted but not enforced.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

use super::CacheStore;

#[derive(Default)]
struct Inner {
    strings: HashMap<String, String>,
    lists: HashMap<String, VecDeque<String>>,
}

#[derive(Default)]
pub struct MemoryCache {
    inner: RwLock<Inner>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve a Redis-style inclusive index window against a list of `len`.
/// Negative indices count from the tail. Returns `None` for an empty window.
fn resolve_window(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { len + start } else { start }.max(0);
    let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);
    if start >= len || stop < 0 || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().await.strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<()> {
        self.inner
            .write()
            .await
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.strings.remove(key);
        inner.lists.remove(key);
        Ok(())
    }

    async fn push_head(&self, key: &str, value: &str) -> Result<()> {
        self.inner
            .write()
            .await
            .lists
            .entry(key.to_string())
            .or_default()
            .push_front(value.to_string());
        Ok(())
    }

    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(list) = inner.lists.get_mut(key) {
            match resolve_window(list.len(), start, stop) {
                Some((start, stop)) => {
                    list.truncate(stop + 1);
                    list.drain(..start);
                }
                None => list.clear(),
            }
        }
        Ok(())
    }

    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        let Some(list) = inner.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(match resolve_window(list.len(), start, stop) {
            Some((start, stop)) => list.iter().skip(start).take(stop - start + 1).cloned().collect(),
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_resolution_matches_redis() {
        // full range
        assert_eq!(resolve_window(5, 0, -1), Some((0, 4)));
        // head window used by the activity log trim
        assert_eq!(resolve_window(5, 0, 99), Some((0, 4)));
        assert_eq!(resolve_window(150, 0, 99), Some((0, 99)));
        // inverted, out-of-range, and empty
        assert_eq!(resolve_window(5, 3, 1), None);
        assert_eq!(resolve_window(5, 0, -7), None);
        assert_eq!(resolve_window(5, 6, 8), None);
        assert_eq!(resolve_window(0, 0, -1), None);
    }

    #[tokio::test]
    async fn list_ops_keep_head_order() {
        let cache = MemoryCache::new();
        for i in 1..=3 {
            cache.push_head("k", &format!("v{i}")).await.unwrap();
        }
        let all = cache.range("k", 0, -1).await.unwrap();
        assert_eq!(all, vec!["v3", "v2", "v1"]);

        cache.trim("k", 0, 1).await.unwrap();
        let trimmed = cache.range("k", 0, -1).await.unwrap();
        assert_eq!(trimmed, vec!["v3", "v2"]);
    }

    #[tokio::test]
    async fn delete_clears_both_shapes() {
        let cache = MemoryCache::new();
        cache.set("s", "x", None).await.unwrap();
        cache.push_head("s", "y").await.unwrap();
        cache.delete("s").await.unwrap();
        assert!(cache.get("s").await.unwrap().is_none());
        assert!(cache.range("s", 0, -1).await.unwrap().is_empty());
    }
}
