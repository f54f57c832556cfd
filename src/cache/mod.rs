use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod memory;
pub mod redis;

pub use memory::MemoryCache;
pub use redis::RedisCache;

/// Key-value cache operations used by sessions and the activity log.
///
/// Backed by Redis in deployment ([`RedisCache`]); [`MemoryCache`] serves
/// local development and tests. List indices follow Redis semantics:
/// negative values count from the tail and ranges are inclusive.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    /// Push a value to the head of the list at `key`.
    async fn push_head(&self, key: &str, value: &str) -> Result<()>;
    /// Trim the list at `key` to the inclusive index window `[start, stop]`.
    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<()>;
    /// Read the inclusive index window `[start, stop]` of the list at `key`.
    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;
}
