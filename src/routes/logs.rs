use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::rbac::AuthUser;
use crate::services::{activity_log, log_query};
use crate::AppState;

/// Direct read of the capped cache list. No session required; the list is
/// shared across users.
async fn activity_logs(State(state): State<AppState>) -> impl IntoResponse {
    match activity_log::recent(state.cache.as_ref()).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": e.to_string()})),
        )
            .into_response(),
    }
}

/// Stream-backed stats with the cache backup as fallback. Only a failure of
/// both sinks surfaces to the caller, as one generic error.
async fn stats_logs(_user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    match log_query::stats_logs(
        state.stream.as_ref(),
        state.cache.as_ref(),
        &state.config.developer_tag,
    )
    .await
    {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(error = %e, "stats retrieval failed on both sinks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "stats logs unavailable from both stream and cache"
                })),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logs/activity", get(activity_logs))
        .route("/logs/stats", get(stats_logs))
}
