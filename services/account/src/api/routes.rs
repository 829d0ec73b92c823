//! 路由表

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use vireo_auth_core::TokenService;

use crate::api::handlers::{auth, channels, users};
use crate::api::middleware::auth_middleware;
use crate::domain::services::{AccountService, ChannelService, SessionService};

/// 上传请求体上限（头像/封面图）
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub account_service: Arc<AccountService>,
    pub channel_service: Arc<ChannelService>,
    pub token_service: Arc<TokenService>,
}

pub fn routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/users/register", post(users::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/channels/{username}", get(channels::channel_profile));

    let protected = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .route("/api/v1/users/me", get(users::me).patch(users::update_profile))
        .route("/api/v1/users/me/avatar", patch(users::update_avatar))
        .route("/api/v1/users/me/cover", patch(users::update_cover))
        .route(
            "/api/v1/channels/{username}/subscribe",
            post(channels::toggle_subscription),
        )
        .layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}
