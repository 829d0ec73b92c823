//! 认证路由处理器

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use vireo_errors::AppResult;

use crate::api::handlers::users::UserResponse;
use crate::api::middleware::AuthClaims;
use crate::api::routes::AppState;
use crate::domain::services::TokenPair;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .session_service
        .login(&req.identifier, &req.password)
        .await?;

    let tokens = state.session_service.issue(&user.id).await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&user),
        tokens,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub tokens: TokenPair,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    // 缺失的令牌字段由会话核心拒绝
    let (_user, tokens) = state
        .session_service
        .refresh(req.refresh_token.as_deref())
        .await?;

    Ok(Json(RefreshResponse { tokens }))
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn logout(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> AppResult<Json<SuccessResponse>> {
    state.session_service.revoke(&claims.user_id()?).await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let user = state.account_service.get(&claims.user_id()?).await?;

    state
        .account_service
        .change_password(&user, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
