use anyhow::Result;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::MySqlPool;

use crate::models::user::User;

pub async fn register_user(pool: &MySqlPool, username: &str, password: &str) -> Result<()> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT username FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        anyhow::bail!("username already taken: {username}");
    }

    let password_hash = hash(password, DEFAULT_COST)?;
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(&password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn verify_user(pool: &MySqlPool, username: &str, password: &str) -> Result<Option<User>> {
    let user_opt = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if let Some(user) = user_opt {
        if verify(password, &user.password_hash)? {
            return Ok(Some(user));
        }
    }
    Ok(None)
}
