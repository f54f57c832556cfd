/// Message persistence and the admin roll-up queries.
use anyhow::Result;
use sqlx::MySqlPool;

use crate::models::message::Message;
use crate::models::user::UserSummary;

pub async fn create_message(pool: &MySqlPool, user_id: &str, message: &str) -> Result<()> {
    sqlx::query("INSERT INTO messages (user_id, message) VALUES (?, ?)")
        .bind(user_id)
        .bind(message)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_messages(pool: &MySqlPool, user_id: &str) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        "SELECT * FROM messages WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

pub async fn search_messages(pool: &MySqlPool, user_id: &str, query: &str) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        "SELECT * FROM messages WHERE user_id = ? AND message LIKE ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(format!("%{query}%"))
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

/// Every registered user with message count and last activity.
pub async fn list_users_with_counts(pool: &MySqlPool) -> Result<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.username, u.created_at,
               COUNT(m.id) AS message_count,
               MAX(m.created_at) AS last_message_at
        FROM users u
        LEFT JOIN messages m ON u.username = m.user_id
        GROUP BY u.id, u.username, u.created_at
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}
