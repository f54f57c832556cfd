//! In-memory implementation of the stats stream.
//!
//! Keeps per-topic vectors behind a `tokio::sync::RwLock`. Exists for local
//! development and tests, where no Kafka broker is available. Not durable.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{topic_for, StatsStream};
use crate::models::log::StatsRecord;

#[derive(Default)]
pub struct MemoryStream {
    topics: RwLock<HashMap<String, Vec<StatsRecord>>>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStream for MemoryStream {
    async fn publish(&self, record: &StatsRecord) -> Result<()> {
        self.topics
            .write()
            .await
            .entry(topic_for(&record.developer_tag))
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn fetch_recent(&self, tag: &str, limit: usize) -> Result<Vec<StatsRecord>> {
        let topics = self.topics.read().await;
        let Some(records) = topics.get(&topic_for(tag)) else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .filter(|r| r.developer_tag == tag)
            .take(limit)
            .cloned()
            .collect())
    }
}
