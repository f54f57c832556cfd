/// Capped recent-activity log in the cache store.
use anyhow::Result;
use tracing::warn;

use crate::cache::CacheStore;
use crate::models::log::{now_stamp, LogEntry};

/// List key holding the recent-activity entries.
pub const ACTIVITY_LOG_KEY: &str = "api_logs";
/// Only this many most-recent entries are retained.
pub const ACTIVITY_LOG_CAP: isize = 100;
/// Action tag marking entries demoted from the stats stream.
pub const STATS_ACTION: &str = "api_stats";

/// Append an entry and trim the list to the cap. Never fails to its caller:
/// any cache or serialization error is logged and swallowed.
pub async fn record(cache: &dyn CacheStore, action: &str, details: &str) {
    let entry = LogEntry {
        timestamp: now_stamp(),
        action: action.to_string(),
        details: details.to_string(),
    };
    let line = match serde_json::to_string(&entry) {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, action, "activity entry serialization failed");
            return;
        }
    };
    if let Err(e) = append_capped(cache, &line).await {
        warn!(error = %e, action, "activity log write failed");
    }
}

/// Push to the head, then trim to the newest [`ACTIVITY_LOG_CAP`] entries.
/// The two commands are individually atomic; under concurrent writers the
/// cap still holds even though which entries survive is racy.
async fn append_capped(cache: &dyn CacheStore, line: &str) -> Result<()> {
    cache.push_head(ACTIVITY_LOG_KEY, line).await?;
    cache.trim(ACTIVITY_LOG_KEY, 0, ACTIVITY_LOG_CAP - 1).await?;
    Ok(())
}

/// Full stored list, most-recent-first. A malformed stored entry fails the
/// whole call with the decode error.
pub async fn recent(cache: &dyn CacheStore) -> Result<Vec<LogEntry>> {
    let raw = cache.range(ACTIVITY_LOG_KEY, 0, -1).await?;
    raw.iter()
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}
