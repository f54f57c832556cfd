//! Pipeline behavior against the in-memory backends: cap enforcement,
//! single-attempt demotion, and the stream-to-cache retrieval fallback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use memoboard::cache::{CacheStore, MemoryCache};
use memoboard::models::log::{CallStatus, StatsRecord};
use memoboard::services::activity_log::{self, ACTIVITY_LOG_CAP, ACTIVITY_LOG_KEY, STATS_ACTION};
use memoboard::services::{log_query, stats_pipeline};
use memoboard::stream::{MemoryStream, StatsStream};

/// Stream that rejects every operation, as an unreachable broker would.
struct DownStream {
    publish_attempts: AtomicUsize,
}

impl DownStream {
    fn new() -> Self {
        Self {
            publish_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl StatsStream for DownStream {
    async fn publish(&self, _record: &StatsRecord) -> Result<()> {
        self.publish_attempts.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("broker unreachable"))
    }

    async fn fetch_recent(&self, _tag: &str, _limit: usize) -> Result<Vec<StatsRecord>> {
        Err(anyhow!("broker unreachable"))
    }
}

/// Cache that rejects every operation.
struct DownCache;

#[async_trait]
impl CacheStore for DownCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("cache unreachable"))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<()> {
        Err(anyhow!("cache unreachable"))
    }
    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Err(anyhow!("cache unreachable"))
    }
    async fn delete(&self, _key: &str) -> Result<()> {
        Err(anyhow!("cache unreachable"))
    }
    async fn push_head(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("cache unreachable"))
    }
    async fn trim(&self, _key: &str, _start: isize, _stop: isize) -> Result<()> {
        Err(anyhow!("cache unreachable"))
    }
    async fn range(&self, _key: &str, _start: isize, _stop: isize) -> Result<Vec<String>> {
        Err(anyhow!("cache unreachable"))
    }
}

fn stamped_record(tag: &str, timestamp: &str) -> StatsRecord {
    StatsRecord {
        developer_tag: tag.to_string(),
        timestamp: timestamp.to_string(),
        endpoint: "/messages".to_string(),
        method: "GET".to_string(),
        status: CallStatus::Success,
        user_id: "alice".to_string(),
        message: format!("alice invoked GET /messages (success) at {timestamp}"),
    }
}

#[tokio::test]
async fn activity_list_caps_at_most_recent_100() {
    let cache = MemoryCache::new();
    for i in 1..=105usize {
        activity_log::record(&cache, "test", &format!("entry {i}")).await;
        let entries = activity_log::recent(&cache).await.unwrap();
        assert_eq!(entries.len(), i.min(ACTIVITY_LOG_CAP as usize));
    }

    let entries = activity_log::recent(&cache).await.unwrap();
    assert_eq!(entries.len(), 100);
    // most-recent-first: 105 at the head, 6 at the tail
    assert_eq!(entries[0].details, "entry 105");
    assert_eq!(entries[99].details, "entry 6");
}

#[tokio::test]
async fn failed_publish_demotes_exactly_once() {
    let stream = Arc::new(DownStream::new());
    let cache = Arc::new(MemoryCache::new());
    let (recorder, worker) =
        stats_pipeline::spawn(stream.clone(), cache.clone(), "teamA".to_string());

    recorder.record_api_call("/messages", "POST", CallStatus::Success, "alice");
    drop(recorder);
    worker.await.unwrap();

    assert_eq!(stream.publish_attempts.load(Ordering::SeqCst), 1);
    let entries = activity_log::recent(cache.as_ref()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, STATS_ACTION);
    assert_eq!(entries[0].details, "alice invoked POST /messages (success)");
}

#[tokio::test]
async fn successful_publish_skips_the_activity_log() {
    let stream = Arc::new(MemoryStream::new());
    let cache = Arc::new(MemoryCache::new());
    let (recorder, worker) =
        stats_pipeline::spawn(stream.clone(), cache.clone(), "teamA".to_string());

    recorder.record_api_call("/messages", "GET", CallStatus::Error, "bob");
    drop(recorder);
    worker.await.unwrap();

    let published = stream.fetch_recent("teamA", 100).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].status, CallStatus::Error);
    assert_eq!(published[0].message, "bob invoked GET /messages (error)");
    assert!(activity_log::recent(cache.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn stream_records_win_over_cache_backup() {
    let stream = MemoryStream::new();
    stream
        .publish(&stamped_record("teamA", "2026-08-06T10:00:00.000000Z"))
        .await
        .unwrap();

    let cache = MemoryCache::new();
    activity_log::record(&cache, STATS_ACTION, "bob invoked GET /messages (success)").await;

    let records = log_query::stats_logs(&stream, &cache, "teamA").await.unwrap();
    assert_eq!(records.len(), 1);
    // stream-native fields, not the demoted placeholders
    assert_eq!(records[0].endpoint, "/messages");
    assert_eq!(records[0].user_id, "alice");
}

#[tokio::test]
async fn empty_stream_falls_back_to_reshaped_backup() {
    let stream = MemoryStream::new();
    let cache = MemoryCache::new();
    activity_log::record(&cache, "db_insert", "message saved: hello...").await;
    activity_log::record(&cache, STATS_ACTION, "alice invoked POST /messages (error)").await;

    let records = log_query::stats_logs(&stream, &cache, "teamA").await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.developer_tag, "teamA");
    assert_eq!(record.endpoint, "unknown");
    assert_eq!(record.method, "unknown");
    assert_eq!(record.user_id, "unknown");
    assert_eq!(record.status, CallStatus::Success);
    assert_eq!(record.message, "alice invoked POST /messages (error)");
}

#[tokio::test]
async fn erroring_stream_falls_back_to_backup() {
    let stream = DownStream::new();
    let cache = MemoryCache::new();
    activity_log::record(&cache, STATS_ACTION, "alice invoked GET /messages (success)").await;

    let records = log_query::stats_logs(&stream, &cache, "teamA").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, "unknown");
}

#[tokio::test]
async fn both_sinks_down_is_one_error() {
    let stream = DownStream::new();
    assert!(log_query::stats_logs(&stream, &DownCache, "teamA")
        .await
        .is_err());
}

#[tokio::test]
async fn tags_are_isolated() {
    let stream = MemoryStream::new();
    stream
        .publish(&stamped_record("alice", "2026-08-06T10:00:00.000000Z"))
        .await
        .unwrap();

    let cache = MemoryCache::new();
    let records = log_query::stats_logs(&stream, &cache, "bob").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn scenario_stream_then_outage() {
    // three records published out of order come back newest-first
    let stream = MemoryStream::new();
    for ts in [
        "2026-08-06T10:00:02.000000Z",
        "2026-08-06T10:00:00.000000Z",
        "2026-08-06T10:00:01.000000Z",
    ] {
        stream.publish(&stamped_record("teamA", ts)).await.unwrap();
    }
    let cache = MemoryCache::new();
    let records = log_query::stats_logs(&stream, &cache, "teamA").await.unwrap();
    let stamps: Vec<&str> = records.iter().map(|r| r.timestamp.as_str()).collect();
    assert_eq!(
        stamps,
        vec![
            "2026-08-06T10:00:02.000000Z",
            "2026-08-06T10:00:01.000000Z",
            "2026-08-06T10:00:00.000000Z",
        ]
    );

    // broker outage: retrieval now returns whatever was demoted to the cache
    let down = DownStream::new();
    activity_log::record(&cache, STATS_ACTION, "alice invoked POST /messages (success)").await;
    let fallback = log_query::stats_logs(&down, &cache, "teamA").await.unwrap();
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].endpoint, "unknown");
}

#[tokio::test]
async fn malformed_entry_fails_direct_read_but_not_backup() {
    let cache = MemoryCache::new();
    cache.push_head(ACTIVITY_LOG_KEY, "not json").await.unwrap();
    activity_log::record(&cache, STATS_ACTION, "alice invoked GET /messages (success)").await;

    // the direct activity read is strict
    assert!(activity_log::recent(&cache).await.is_err());

    // the backup scan skips what it cannot parse
    let stream = MemoryStream::new();
    let records = log_query::stats_logs(&stream, &cache, "teamA").await.unwrap();
    assert_eq!(records.len(), 1);
}
