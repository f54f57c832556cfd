use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::models::log::CallStatus;
use crate::models::message::CreateMessageReq;
use crate::rbac::AuthUser;
use crate::services::{activity_log, message_service};
use crate::AppState;

/// Activity-log details keep only the start of the saved message.
const MESSAGE_PREVIEW_CHARS: usize = 30;

async fn create_message(
    user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateMessageReq>,
) -> impl IntoResponse {
    match message_service::create_message(&state.pool, &user.user_id, &req.message).await {
        Ok(()) => {
            let preview: String = req.message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
            activity_log::record(
                state.cache.as_ref(),
                "db_insert",
                &format!("message saved: {preview}..."),
            )
            .await;
            state
                .stats
                .record_api_call("/messages", "POST", CallStatus::Success, &user.user_id);
            Json(json!({"status": "success"})).into_response()
        }
        Err(e) => {
            state
                .stats
                .record_api_call("/messages", "POST", CallStatus::Error, &user.user_id);
            activity_log::record(state.cache.as_ref(), "db_insert_error", &e.to_string()).await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn list_messages(user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    match message_service::list_messages(&state.pool, &user.user_id).await {
        Ok(messages) => {
            state
                .stats
                .record_api_call("/messages", "GET", CallStatus::Success, &user.user_id);
            Json(messages).into_response()
        }
        Err(e) => {
            state
                .stats
                .record_api_call("/messages", "GET", CallStatus::Error, &user.user_id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_messages(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match message_service::search_messages(&state.pool, &user.user_id, &params.q).await {
        Ok(messages) => {
            state.stats.record_api_call(
                "/messages/search",
                "GET",
                CallStatus::Success,
                &user.user_id,
            );
            Json(messages).into_response()
        }
        Err(e) => {
            state
                .stats
                .record_api_call("/messages/search", "GET", CallStatus::Error, &user.user_id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(create_message).get(list_messages))
        .route("/messages/search", get(search_messages))
}
