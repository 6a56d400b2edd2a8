//! 认证 handlers
//!
//! - POST /auth/login - 登录换取 access token
//! - GET  /auth/me - 当前用户摘要
//! - POST /auth/register - 创建用户（仅管理员）

use crate::AppState;
use crate::middleware::{require_admin, require_user};
use crate::utils::response::{
    auth_error, bad_request_error, internal_auth_error, storage_error, user_to_summary,
};
use crate::utils::{normalize_required, now_ms};
use api_contract::{ApiResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserSummaryDto};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use smartpark_auth::{AuthError, hash_password};
use smartpark_storage::UserRecord;
use uuid::Uuid;

/// 最短口令长度。
const MIN_PASSWORD_LENGTH: usize = 8;

/// 登录
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.username, &req.password).await {
        Ok((user, token)) => {
            let response = LoginResponse {
                token: token.token,
                expires: token.expires_at.saturating_mul(1000),
                user: user_to_summary(&user),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}

/// 当前用户
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let response = MeResponse {
        user: UserSummaryDto {
            id: ctx.user_id,
            username: ctx.username,
            role: ctx.role,
        },
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 创建用户（仅管理员）
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let username = match normalize_required(req.username, "username") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return bad_request_error("password must be at least 8 characters");
    }
    let role = req.role.unwrap_or_else(|| domain::roles::MANAGER.to_string());
    if !domain::roles::is_valid(&role) {
        return bad_request_error("role must be admin or manager");
    }
    match state.users.find_by_username(&username).await {
        Ok(Some(_)) => return bad_request_error("username already exists"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => return internal_auth_error(err),
    };
    let record = UserRecord {
        user_id: Uuid::new_v4().to_string(),
        username,
        password_hash,
        role,
        is_active: true,
        created_at_ms: now_ms(),
    };
    match state.users.create_user(record).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user_to_summary(&user))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}
