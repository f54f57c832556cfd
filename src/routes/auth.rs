use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use crate::models::user::CredentialsReq;
use crate::rbac::AuthUser;
use crate::services::{auth_service, session_service};
use crate::AppState;

async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() {
        return missing_credentials();
    }
    match auth_service::register_user(&state.pool, &req.username, &req.password).await {
        Ok(()) => Json(json!({
            "status": "success",
            "message": "registration complete"
        }))
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": e.to_string()})),
        )
            .into_response(),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() {
        return missing_credentials();
    }

    // Environment-defined admin account, checked before the users table.
    if req.username == state.config.admin_username && req.password == state.config.admin_password {
        session_service::store(state.cache.as_ref(), &req.username, true).await;
        return Json(json!({
            "status": "success",
            "message": "admin login successful",
            "username": req.username.clone(),
            "is_admin": true,
            "token": req.username,
        }))
        .into_response();
    }

    match auth_service::verify_user(&state.pool, &req.username, &req.password).await {
        Ok(Some(user)) => {
            session_service::store(state.cache.as_ref(), &user.username, false).await;
            Json(json!({
                "status": "success",
                "message": "login successful",
                "username": user.username.clone(),
                "is_admin": false,
                "token": user.username,
            }))
            .into_response()
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "invalid credentials"})),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "login failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "login failed"})),
            )
                .into_response()
        }
    }
}

async fn logout(user: Option<AuthUser>, State(state): State<AppState>) -> impl IntoResponse {
    if let Some(user) = user {
        session_service::clear(state.cache.as_ref(), &user.user_id).await;
    }
    Json(json!({"status": "success", "message": "logged out"}))
}

fn missing_credentials() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "message": "username and password are required"})),
    )
        .into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
