//! 会话服务
//!
//! 凭证与会话生命周期的核心状态机：签发、验证、轮换、吊销。
//! 会话真相只存在于用户记录的单槽 refresh_token 字段，
//! 服务本身无状态，仅持有 User Store 与 Token Codec 的引用。

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use vireo_auth_core::TokenService;
use vireo_common::UserId;
use vireo_errors::{AppError, AppResult};

use crate::domain::repositories::UserRepository;
use crate::domain::services::PasswordService;
use crate::domain::user::User;

/// 一次签发产出的令牌对
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

pub struct SessionService {
    user_repo: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
}

impl SessionService {
    pub fn new(user_repo: Arc<dyn UserRepository>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// 按用户名或邮箱验证凭证
    ///
    /// 未知标识符与密码错误统一返回同一种拒绝，
    /// 避免暴露账户是否存在
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<User> {
        let identifier = identifier.trim().to_lowercase();

        if identifier.is_empty() || password.is_empty() {
            return Err(AppError::validation("Identifier and password are required"));
        }

        let user = match self.user_repo.find_by_identifier(&identifier).await? {
            Some(user) => user,
            None => {
                warn!(identifier = %identifier, "Login attempt for unknown identifier");
                metrics::counter!("account_logins_total", "outcome" => "failure").increment(1);
                return Err(AppError::unauthenticated("Invalid credentials"));
            }
        };

        let valid = PasswordService::verify_password(password, &user.password_hash)?;
        if !valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            metrics::counter!("account_logins_total", "outcome" => "failure").increment(1);
            return Err(AppError::unauthenticated("Invalid credentials"));
        }

        metrics::counter!("account_logins_total", "outcome" => "success").increment(1);
        Ok(user)
    }

    /// 为已认证的用户签发新的令牌对
    ///
    /// 刷新令牌写入用户记录的会话槽位，覆盖旧值；
    /// 此时身份已经确立，任何失败都属于服务端故障
    pub async fn issue(&self, user_id: &UserId) -> AppResult<TokenPair> {
        let access_token = self.token_service.generate_access_token(user_id)?;
        let refresh_token = self.token_service.generate_refresh_token(user_id)?;

        self.user_repo
            .set_refresh_token(user_id, &refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to persist refresh token");
                AppError::internal("Failed to issue session tokens")
            })?;

        debug!(user_id = %user_id, "Issued new token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_expires_in(),
            token_type: "Bearer".to_string(),
        })
    }

    /// 用刷新令牌换取新的令牌对（轮换）
    ///
    /// 接受仅当：令牌存在、签名与有效期合法、载荷指向真实用户、
    /// 且与该用户会话槽位中存储的值逐字节一致。
    /// 已被轮换或吊销的令牌在最后一步被拒绝，即防重放检查
    pub async fn refresh(&self, presented: Option<&str>) -> AppResult<(User, TokenPair)> {
        let presented = presented
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Refresh token missing"))?;

        let claims = self
            .token_service
            .validate_refresh_token(presented)
            .map_err(|_| AppError::unauthenticated("Invalid or expired refresh token"))?;

        let user_id = claims.user_id()?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid refresh token"))?;

        if user.refresh_token.as_deref() != Some(presented) {
            warn!(user_id = %user.id, "Superseded or revoked refresh token presented");
            metrics::counter!("account_token_refreshes_total", "outcome" => "replayed")
                .increment(1);
            return Err(AppError::unauthenticated("Refresh token is expired or used"));
        }

        // 签发即覆盖槽位，旧令牌随之失效
        let pair = self.issue(&user.id).await?;

        metrics::counter!("account_token_refreshes_total", "outcome" => "success").increment(1);
        Ok((user, pair))
    }

    /// 清空用户的会话槽位，立即吊销在外的刷新令牌
    ///
    /// 没有活跃令牌时也成功（幂等）
    pub async fn revoke(&self, user_id: &UserId) -> AppResult<()> {
        self.user_repo.clear_refresh_token(user_id).await?;

        debug!(user_id = %user_id, "Session revoked");
        Ok(())
    }
}

// ============================================================
// 单元测试
// ============================================================
