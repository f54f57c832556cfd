use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)] // never serialize password hash
    pub password_hash: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsReq {
    pub username: String,
    pub password: String,
}

/// Per-user roll-up returned by the admin user listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub created_at: chrono::NaiveDateTime,
    pub message_count: i64,
    pub last_message_at: Option<chrono::NaiveDateTime>,
}
