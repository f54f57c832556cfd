/// Stats retrieval: live stream first, cache backup second.
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::models::log::{CallStatus, LogEntry, StatsRecord};
use crate::services::activity_log::{ACTIVITY_LOG_KEY, STATS_ACTION};
use crate::stream::StatsStream;

/// Hard cap on records returned by one retrieval call.
pub const STATS_FETCH_LIMIT: usize = 100;

/// Placeholder for fields a demoted record no longer carries.
const UNKNOWN: &str = "unknown";

/// Read the caller's stats records, newest first.
///
/// Stream data wins whenever any exists; an empty or failing stream read
/// falls back to the activity-log entries that were demoted there. Only when
/// both sinks fail does the caller see an error.
pub async fn stats_logs(
    stream: &dyn StatsStream,
    cache: &dyn CacheStore,
    tag: &str,
) -> Result<Vec<StatsRecord>> {
    match stream.fetch_recent(tag, STATS_FETCH_LIMIT).await {
        Ok(records) if !records.is_empty() => Ok(sorted_desc(records)),
        Ok(_) => {
            info!(tag, "stream yielded no stats records, reading cache backup");
            backup_stats(cache, tag).await
        }
        Err(e) => {
            warn!(tag, error = %e, "stream retrieval failed, reading cache backup");
            backup_stats(cache, tag).await
        }
    }
}

/// Reshape the demoted activity-log entries into stream-record form.
/// Endpoint, method and user are gone once demoted; only the composite
/// message and the timestamp survive. Unreadable entries are skipped here,
/// unlike the strict direct activity read.
async fn backup_stats(cache: &dyn CacheStore, tag: &str) -> Result<Vec<StatsRecord>> {
    let raw = cache
        .range(ACTIVITY_LOG_KEY, 0, -1)
        .await
        .context("activity backup unavailable")?;
    let records = raw
        .iter()
        .filter_map(|line| serde_json::from_str::<LogEntry>(line).ok())
        .filter(|entry| entry.action == STATS_ACTION)
        .map(|entry| StatsRecord {
            developer_tag: tag.to_string(),
            timestamp: entry.timestamp,
            endpoint: UNKNOWN.to_string(),
            method: UNKNOWN.to_string(),
            status: CallStatus::Success,
            user_id: UNKNOWN.to_string(),
            message: entry.details,
        })
        .collect();
    Ok(sorted_desc(records))
}

fn sorted_desc(mut records: Vec<StatsRecord>) -> Vec<StatsRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str) -> StatsRecord {
        StatsRecord {
            developer_tag: "teamA".into(),
            timestamp: ts.into(),
            endpoint: "/messages".into(),
            method: "GET".into(),
            status: CallStatus::Success,
            user_id: "alice".into(),
            message: String::new(),
        }
    }

    #[test]
    fn sort_is_newest_first() {
        let sorted = sorted_desc(vec![
            record("2026-08-06T10:00:00.000000Z"),
            record("2026-08-06T12:00:00.000000Z"),
            record("2026-08-06T11:00:00.000000Z"),
        ]);
        let stamps: Vec<&str> = sorted.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "2026-08-06T12:00:00.000000Z",
                "2026-08-06T11:00:00.000000Z",
                "2026-08-06T10:00:00.000000Z",
            ]
        );
    }
}
