/// Cache-backed login sessions. Session writes are always best-effort:
/// a broken cache never fails the login or logout that triggered them.
use std::time::Duration;
use tracing::warn;

use crate::cache::CacheStore;
use crate::models::log::{now_stamp, Session};

/// Sessions expire one hour after login.
pub const SESSION_TTL: Duration = Duration::from_secs(3600);

fn session_key(user_id: &str) -> String {
    format!("session:{user_id}")
}

pub async fn store(cache: &dyn CacheStore, user_id: &str, is_admin: bool) {
    let session = Session {
        user_id: user_id.to_string(),
        is_admin,
        login_time: now_stamp(),
    };
    let value = match serde_json::to_string(&session) {
        Ok(value) => value,
        Err(e) => {
            warn!(user_id, error = %e, "session serialization failed");
            return;
        }
    };
    if let Err(e) = cache
        .set(&session_key(user_id), &value, Some(SESSION_TTL))
        .await
    {
        warn!(user_id, error = %e, "session store failed");
    }
}

/// Resolve a live session, if any. Unreadable session payloads count as
/// no session.
pub async fn fetch(cache: &dyn CacheStore, user_id: &str) -> Option<Session> {
    match cache.get(&session_key(user_id)).await {
        Ok(Some(value)) => serde_json::from_str(&value).ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(user_id, error = %e, "session lookup failed");
            None
        }
    }
}

pub async fn clear(cache: &dyn CacheStore, user_id: &str) {
    if let Err(e) = cache.delete(&session_key(user_id)).await {
        warn!(user_id, error = %e, "session delete failed");
    }
}
