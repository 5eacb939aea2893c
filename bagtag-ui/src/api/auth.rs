//! Account and session endpoints
//!
//! Bearer-token sessions: signup and login both mint a token, logout
//! revokes it. Every inventory endpoint authenticates through the
//! [`AuthUser`] extractor, so ownership scoping is uniform.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::post,
    Json, Router,
};
use bagtag_common::db::{sessions, users};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Authenticated user, extracted from the `Authorization: Bearer` header
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = sessions::user_for_token(&state.db, token).await?;
        Ok(AuthUser { user_id })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// POST /api/auth/signup
///
/// Creates the account and signs it in immediately.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let account = users::create_user(
        &state.db,
        &payload.email,
        &payload.password,
        &payload.display_name,
    )
    .await?;
    let token = sessions::create_session(&state.db, account.user_id).await?;

    info!(email = %account.email, "Account created");
    Ok(Json(SessionResponse {
        token,
        user_id: account.user_id,
        email: account.email,
        display_name: account.display_name,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let account = users::verify_login(&state.db, &payload.email, &payload.password).await?;
    let token = sessions::create_session(&state.db, account.user_id).await?;

    info!(email = %account.email, "Login succeeded");
    Ok(Json(SessionResponse {
        token,
        user_id: account.user_id,
        email: account.email,
        display_name: account.display_name,
    }))
}

/// POST /api/auth/logout
///
/// Revokes the presented token. Idempotent: an already-revoked token
/// still gets a 200.
pub async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = bearer_token(&headers)?;
    sessions::delete_session(&state.db, token).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Build authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}
