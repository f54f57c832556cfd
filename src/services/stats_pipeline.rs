/// Asynchronous API-call stats delivery: stream first, activity log second.
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::CacheStore;
use crate::models::log::{now_stamp, CallStatus, StatsRecord};
use crate::services::activity_log::{self, STATS_ACTION};
use crate::stream::StatsStream;

/// Maximum records queued but not yet delivered. A full queue drops the
/// newest record with a warning instead of blocking the request path.
pub const STATS_QUEUE_DEPTH: usize = 256;

struct StatsJob {
    endpoint: String,
    method: String,
    status: CallStatus,
    user_id: String,
}

/// Non-blocking front of the pipeline, cloned into every request handler.
#[derive(Clone)]
pub struct StatsRecorder {
    tx: mpsc::Sender<StatsJob>,
}

impl StatsRecorder {
    /// Queue one API-call record. Returns immediately; the HTTP response
    /// never waits for delivery.
    pub fn record_api_call(&self, endpoint: &str, method: &str, status: CallStatus, user_id: &str) {
        let job = StatsJob {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status,
            user_id: user_id.to_string(),
        };
        if self.tx.try_send(job).is_err() {
            warn!(endpoint, "stats queue full, dropping record");
        }
    }
}

/// Start the delivery worker. The returned handle completes once every
/// recorder clone is dropped and the queue has drained.
pub fn spawn(
    stream: Arc<dyn StatsStream>,
    cache: Arc<dyn CacheStore>,
    developer_tag: String,
) -> (StatsRecorder, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(STATS_QUEUE_DEPTH);
    let worker = tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            deliver(stream.as_ref(), cache.as_ref(), &developer_tag, job).await;
        }
    });
    (StatsRecorder { tx }, worker)
}

/// One attempt at the stream; on failure, at most one demotion into the
/// activity log. Neither sink is retried and nothing propagates: a record
/// that both sinks reject is lost.
async fn deliver(stream: &dyn StatsStream, cache: &dyn CacheStore, tag: &str, job: StatsJob) {
    let message = composite_message(&job.user_id, &job.method, &job.endpoint, job.status);
    let record = StatsRecord {
        developer_tag: tag.to_string(),
        timestamp: now_stamp(),
        endpoint: job.endpoint,
        method: job.method,
        status: job.status,
        user_id: job.user_id,
        message,
    };
    if let Err(e) = stream.publish(&record).await {
        warn!(error = %e, endpoint = %record.endpoint, "stats publish failed, demoting to activity log");
        activity_log::record(cache, STATS_ACTION, &record.message).await;
    }
}

/// Human-readable summary carried both on the stream record and, after a
/// demotion, as the activity-log details.
fn composite_message(user_id: &str, method: &str, endpoint: &str, status: CallStatus) -> String {
    format!("{user_id} invoked {method} {endpoint} ({status})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_message_shape() {
        assert_eq!(
            composite_message("alice", "POST", "/messages", CallStatus::Success),
            "alice invoked POST /messages (success)"
        );
        assert_eq!(
            composite_message("admin", "GET", "/admin/users", CallStatus::Error),
            "admin invoked GET /admin/users (error)"
        );
    }
}
