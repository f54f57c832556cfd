use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::services::session_service;
use crate::AppState;

/// Caller with a live session, resolved from the cache store per request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub is_admin: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let Some(user_id) = token else {
            return Err(unauthorized());
        };
        match session_service::fetch(state.cache.as_ref(), user_id).await {
            Some(session) => Ok(AuthUser {
                user_id: session.user_id,
                is_admin: session.is_admin,
            }),
            None => Err(unauthorized()),
        }
    }
}

pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        if auth_user.is_admin {
            Ok(AdminUser(auth_user))
        } else {
            Err((
                StatusCode::FORBIDDEN,
                Json(json!({"status": "error", "message": "admin rights required"})),
            ))
        }
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": "error", "message": "login required"})),
    )
}
