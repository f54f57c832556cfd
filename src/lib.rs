pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod rbac;
pub mod routes;
pub mod services;
pub mod stream;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cache::CacheStore;
use config::Config;
use services::stats_pipeline::StatsRecorder;
use stream::StatsStream;

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::MySqlPool,
    pub cache: Arc<dyn CacheStore>,
    pub stream: Arc<dyn StatsStream>,
    pub stats: StatsRecorder,
    pub config: Arc<Config>,
}

impl axum::extract::FromRef<AppState> for sqlx::MySqlPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
