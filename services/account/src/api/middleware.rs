//! 认证中间件

use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};
use vireo_auth_core::{Claims, TokenService};
use vireo_errors::AppError;

/// 认证 Claims 提取器
///
/// 用于从请求中获取已验证的 Claims
/// 应该在 auth_middleware 之后使用
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| AppError::unauthenticated("Missing authentication"))
    }
}

/// 从请求头中提取并验证访问令牌
///
/// 供可选认证的路由使用；任何验证失败都视为匿名访问
pub fn claims_from_headers(headers: &HeaderMap, token_service: &TokenService) -> Option<Claims> {
    let header = headers.get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    token_service.validate_access_token(token).ok()
}

/// JWT 认证中间件
///
/// 验证请求中的访问令牌并将 claims 注入到请求扩展中
pub async fn auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = &header[7..];
            debug!("Validating access token");

            match token_service.validate_access_token(token) {
                Ok(claims) => {
                    debug!(user_id = %claims.sub, "Token validated");

                    // 将 claims 注入到请求扩展中
                    let mut request = request;
                    request.extensions_mut().insert(claims);

                    Ok(next.run(request).await)
                }
                Err(e) => {
                    warn!(error = %e, "Token validation failed");
                    Err(AppError::unauthenticated("Invalid or expired access token"))
                }
            }
        }
        _ => {
            warn!("Missing or invalid authorization header");
            Err(AppError::unauthenticated("Missing authorization header"))
        }
    }
}
