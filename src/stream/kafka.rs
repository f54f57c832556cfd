use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use uuid::Uuid;

use super::{topic_for, StatsStream, TOPIC_PREFIX};
use crate::models::log::StatsRecord;

/// How long a publish may wait for broker acknowledgement.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);
/// No new message for this long means the topic is considered drained.
const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka-backed stats stream over SASL_PLAINTEXT with PLAIN credentials.
///
/// The producer is created once and reused for every publish; consumers are
/// per-retrieval, each under a throwaway group id so reads always start from
/// the earliest retained offset.
pub struct KafkaStream {
    producer: FutureProducer,
    servers: String,
    username: String,
    password: String,
}

impl KafkaStream {
    pub fn connect(servers: &str, username: &str, password: &str) -> Result<Self> {
        let producer = base_config(servers, username, password)
            .create()
            .context("kafka producer init failed")?;
        Ok(Self {
            producer,
            servers: servers.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn viewer(&self, topic: &str) -> Result<StreamConsumer> {
        let group = format!("{TOPIC_PREFIX}-viewer-{}", Uuid::new_v4());
        let consumer: StreamConsumer = base_config(&self.servers, &self.username, &self.password)
            .set("group.id", &group)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "false")
            .create()
            .context("kafka consumer init failed")?;
        consumer
            .subscribe(&[topic])
            .context("kafka subscribe failed")?;
        Ok(consumer)
    }
}

fn base_config(servers: &str, username: &str, password: &str) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", servers)
        .set("security.protocol", "sasl_plaintext")
        .set("sasl.mechanisms", "PLAIN")
        .set("sasl.username", username)
        .set("sasl.password", password);
    config
}

#[async_trait]
impl StatsStream for KafkaStream {
    async fn publish(&self, record: &StatsRecord) -> Result<()> {
        let topic = topic_for(&record.developer_tag);
        let payload = serde_json::to_vec(record)?;
        self.producer
            .send(
                FutureRecord::to(&topic)
                    .key(&record.developer_tag)
                    .payload(&payload),
                Timeout::After(DELIVERY_TIMEOUT),
            )
            .await
            .map_err(|(e, _)| anyhow!("stats publish to {topic} failed: {e}"))?;
        Ok(())
    }

    async fn fetch_recent(&self, tag: &str, limit: usize) -> Result<Vec<StatsRecord>> {
        let topic = topic_for(tag);
        // The consumer is dropped on every return path below, which tears
        // down the subscription and its group.
        let consumer = self.viewer(&topic)?;
        let mut records = Vec::new();
        loop {
            let msg = match tokio::time::timeout(IDLE_TIMEOUT, consumer.recv()).await {
                Err(_) => break, // idle: topic drained
                Ok(Err(e)) => return Err(anyhow!("stats consume from {topic} failed: {e}")),
                Ok(Ok(msg)) => msg,
            };
            let Some(payload) = msg.payload() else {
                continue;
            };
            let record: StatsRecord =
                serde_json::from_slice(payload).context("malformed stats record on stream")?;
            if record.developer_tag != tag {
                // topic naming already partitions by tag; re-filter anyway
                continue;
            }
            records.push(record);
            if records.len() >= limit {
                break;
            }
        }
        Ok(records)
    }
}
