//! 用户路由处理器

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vireo_errors::{AppError, AppResult};

use crate::api::middleware::AuthClaims;
use crate::api::routes::AppState;
use crate::domain::services::{ProfileChanges, RegisterAccount};
use crate::domain::user::User;

/// 安全投影：凭证与会话字段绝不出现在响应中
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            cover_image_url: user.cover_image_url.clone(),
            created_at: user.timestamps.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .account_service
        .register(RegisterAccount {
            username: req.username,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

pub async fn me(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get(&claims.user_id()?).await?;

    Ok(Json(UserResponse::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get(&claims.user_id()?).await?;

    let user = state
        .account_service
        .update_profile(
            user,
            ProfileChanges {
                display_name: req.display_name,
                email: req.email,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

pub async fn update_avatar(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get(&claims.user_id()?).await?;
    let (bytes, filename, content_type) = read_image_field(multipart, "avatar").await?;

    let user = state
        .account_service
        .update_avatar(user, bytes, &filename, &content_type)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

pub async fn update_cover(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get(&claims.user_id()?).await?;
    let (bytes, filename, content_type) = read_image_field(multipart, "cover").await?;

    let user = state
        .account_service
        .update_cover(user, bytes, &filename, &content_type)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// 从 multipart 表单中取出指定名称的图片字段
async fn read_image_field(
    mut multipart: Multipart,
    field_name: &str,
) -> AppResult<(Vec<u8>, String, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some(field_name) {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read upload: {}", e)))?
                .to_vec();

            return Ok((bytes, filename, content_type));
        }
    }

    Err(AppError::validation(format!(
        "Missing '{}' file field",
        field_name
    )))
}
