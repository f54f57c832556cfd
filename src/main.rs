use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use memoboard::cache::{CacheStore, MemoryCache, RedisCache};
use memoboard::config::Config;
use memoboard::services::stats_pipeline;
use memoboard::stream::{KafkaStream, MemoryStream, StatsStream};
use memoboard::{app, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memoboard=debug")),
        )
        .init();

    let config = Arc::new(Config::from_env());

    let pool = db::connect(&config.database_url)?;
    if std::path::Path::new("migrations").exists() {
        if let Err(e) = db::run_migrations(&pool).await {
            // Ignore common "already exists" failures, log as info
            let msg = e.to_string();
            if msg.contains("already exists") {
                tracing::info!("migration benign: {msg}");
            } else {
                tracing::warn!("migration error: {msg}");
            }
        }
    } else {
        tracing::warn!("migrations folder not found, skipping DB setup");
    }

    let cache: Arc<dyn CacheStore> = if config.redis_url.is_empty() {
        tracing::warn!("REDIS_URL empty, using in-memory cache");
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(RedisCache::connect(&config.redis_url).await?)
    };

    let stream: Arc<dyn StatsStream> = if config.kafka_servers.is_empty() {
        tracing::warn!("KAFKA_SERVERS empty, using in-memory stats stream");
        Arc::new(MemoryStream::new())
    } else {
        Arc::new(KafkaStream::connect(
            &config.kafka_servers,
            &config.kafka_username,
            &config.kafka_password,
        )?)
    };

    let (stats, _worker) =
        stats_pipeline::spawn(stream.clone(), cache.clone(), config.developer_tag.clone());

    let state = AppState {
        pool,
        cache,
        stream,
        stats,
        config: config.clone(),
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = term => {} }
}
