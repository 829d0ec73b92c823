//! 频道路由处理器

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;
use vireo_errors::AppResult;

use crate::api::middleware::{AuthClaims, claims_from_headers};
use crate::api::routes::AppState;
use crate::domain::subscription::ChannelProfile;

/// 频道聚合视图
///
/// 可选认证：携带有效访问令牌的访问者会得到 is_subscribed 标记
pub async fn channel_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<ChannelProfile>> {
    let viewer = claims_from_headers(&headers, &state.token_service)
        .and_then(|claims| claims.user_id().ok());

    let profile = state
        .channel_service
        .channel_profile(&username, viewer.as_ref())
        .await?;

    Ok(Json(profile))
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscribed: bool,
}

pub async fn toggle_subscription(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(username): Path<String>,
) -> AppResult<Json<SubscriptionResponse>> {
    let subscribed = state
        .channel_service
        .toggle_subscription(&claims.user_id()?, &username)
        .await?;

    Ok(Json(SubscriptionResponse { subscribed }))
}
