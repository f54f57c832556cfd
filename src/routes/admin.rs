use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::models::log::CallStatus;
use crate::models::user::UserSummary;
use crate::rbac::AdminUser;
use crate::services::message_service;
use crate::AppState;

async fn list_users(admin: AdminUser, State(state): State<AppState>) -> impl IntoResponse {
    match message_service::list_users_with_counts(&state.pool).await {
        Ok(users) => {
            // The admin account lives in the environment, not the users table.
            let admin_row = UserSummary {
                id: 0,
                username: state.config.admin_username.clone(),
                created_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.naive_utc(),
                message_count: 0,
                last_message_at: None,
            };
            let all: Vec<UserSummary> = std::iter::once(admin_row).chain(users).collect();
            let total_count = all.len();
            state.stats.record_api_call(
                "/admin/users",
                "GET",
                CallStatus::Success,
                &admin.0.user_id,
            );
            Json(json!({
                "status": "success",
                "users": all,
                "total_count": total_count,
            }))
            .into_response()
        }
        Err(e) => {
            state
                .stats
                .record_api_call("/admin/users", "GET", CallStatus::Error, &admin.0.user_id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn user_messages(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let endpoint = format!("/admin/users/{username}/messages");
    match message_service::list_messages(&state.pool, &username).await {
        Ok(messages) => {
            let message_count = messages.len();
            state
                .stats
                .record_api_call(&endpoint, "GET", CallStatus::Success, &admin.0.user_id);
            Json(json!({
                "status": "success",
                "username": username,
                "messages": messages,
                "message_count": message_count,
            }))
            .into_response()
        }
        Err(e) => {
            state
                .stats
                .record_api_call(&endpoint, "GET", CallStatus::Error, &admin.0.user_id);
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
        .route("/admin/users", get(list_users))
        .route("/admin/users/:username/messages", get(user_messages))
}
