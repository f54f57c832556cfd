use anyhow::Result;
use async_trait::async_trait;

use crate::models::log::StatsRecord;

pub mod kafka;
pub mod memory;

pub use kafka::KafkaStream;
pub use memory::MemoryStream;

/// Topic prefix for per-developer stats topics.
pub const TOPIC_PREFIX: &str = "api-logs";

/// Topic carrying the stats records of one developer tag.
pub fn topic_for(tag: &str) -> String {
    format!("{TOPIC_PREFIX}-{tag}")
}

/// Producer/consumer operations against the stats log stream.
///
/// `publish` resolves only once the broker acknowledged delivery or delivery
/// failed, so callers see publish failures before moving on. `fetch_recent`
/// reads the topic of `tag` from the earliest retained offset under a fresh
/// non-persistent group identity, re-filters on the embedded tag, and stops
/// at `limit` records or when the topic has been idle long enough to be
/// considered drained.
#[async_trait]
pub trait StatsStream: Send + Sync {
    async fn publish(&self, record: &StatsRecord) -> Result<()>;
    async fn fetch_recent(&self, tag: &str, limit: usize) -> Result<Vec<StatsRecord>>;
}
