/// Log models shared by the activity log and the stats pipeline
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the capped Redis activity list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub action: String,
    pub details: String,
}

/// Outcome tag attached to every recorded API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API-call record published to the stats stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRecord {
    pub developer_tag: String,
    pub timestamp: String,
    pub endpoint: String,
    pub method: String,
    pub status: CallStatus,
    pub user_id: String,
    pub message: String,
}

/// Cache-backed login session, keyed `session:<user_id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub is_admin: bool,
    pub login_time: String,
}

/// Current time as fixed-width UTC RFC 3339 with microseconds.
///
/// Every producer in the crate stamps with this single format so that the
/// lexicographic ordering of timestamp strings matches chronological order.
pub fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
