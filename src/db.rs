use anyhow::Result;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::fs;
use std::time::Duration;

/// Lazy pool: the first query opens the connection, so the server comes up
/// even while the database is still starting.
pub fn connect(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Apply migrations/*.sql in filename order. MySQL rejects multi-statement
/// batches on a plain connection, so each file is split on `;`.
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir("migrations")?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.path());
    for e in entries {
        let p = e.path();
        if p.extension().and_then(|s| s.to_str()) == Some("sql") {
            let sql = fs::read_to_string(&p)?;
            for stmt in sql.split(';') {
                let stmt = stmt.trim();
                if stmt.is_empty() {
                    continue;
                }
                sqlx::query(stmt).execute(pool).await?;
            }
        }
    }
    Ok(())
}
