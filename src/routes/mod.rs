use axum::{routing::get, Router};

use crate::AppState;

pub mod admin;
pub mod auth;
pub mod logs;
pub mod messages;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(messages::router())
        .merge(logs::router())
        .merge(admin::router())
}
