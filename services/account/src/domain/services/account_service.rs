//! 账户服务
//!
//! 注册、密码修改、资料与媒体更新。注册只创建记录，
//! 不签发任何令牌：注册与登录是两个独立步骤

use std::sync::Arc;

use tracing::info;
use vireo_adapter_media::MediaStorage;
use vireo_common::UserId;
use vireo_errors::{AppError, AppResult};

use crate::domain::repositories::UserRepository;
use crate::domain::services::PasswordService;
use crate::domain::user::User;
use crate::domain::value_objects::{Email, Username};

/// 注册输入
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// 资料变更（至少一个字段）
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

pub struct AccountService {
    user_repo: Arc<dyn UserRepository>,
    media: Arc<dyn MediaStorage>,
}

impl AccountService {
    pub fn new(user_repo: Arc<dyn UserRepository>, media: Arc<dyn MediaStorage>) -> Self {
        Self { user_repo, media }
    }

    /// 根据 ID 取用户
    pub async fn get(&self, user_id: &UserId) -> AppResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// 注册新账户
    pub async fn register(&self, input: RegisterAccount) -> AppResult<User> {
        let username = Username::new(&input.username)?;
        let email = Email::new(&input.email)?;

        let display_name = input.display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::validation("Display name is required"));
        }

        if self.user_repo.exists_by_username(&username).await? {
            return Err(AppError::conflict("Username already registered"));
        }

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = PasswordService::hash_password(&input.password)?;

        let user = User::new(username, email, password_hash, display_name.to_string());
        self.user_repo.create(&user).await?;

        info!(user_id = %user.id, username = %user.username, "Account registered");
        metrics::counter!("account_registrations_total").increment(1);

        Ok(user)
    }

    /// 修改密码
    ///
    /// 先验证当前密码，再存储新哈希
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let valid = PasswordService::verify_password(current_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::unauthenticated("Invalid current password"));
        }

        let new_hash = PasswordService::hash_password(new_password)?;
        self.user_repo.update_password(&user.id, &new_hash).await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// 更新资料字段
    pub async fn update_profile(&self, mut user: User, changes: ProfileChanges) -> AppResult<User> {
        if changes.display_name.is_none() && changes.email.is_none() {
            return Err(AppError::validation("No profile fields to update"));
        }

        if let Some(display_name) = changes.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(AppError::validation("Display name cannot be empty"));
            }
            user.rename(display_name);
        }

        if let Some(email) = changes.email {
            let email = Email::new(&email)?;
            if email != user.email && self.user_repo.exists_by_email(&email).await? {
                return Err(AppError::conflict("Email already registered"));
            }
            user.change_email(email);
        }

        self.user_repo.update(&user).await?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// 上传并更新头像
    pub async fn update_avatar(
        &self,
        user: User,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> AppResult<User> {
        self.update_image(user, bytes, filename, content_type, ImageKind::Avatar)
            .await
    }

    /// 上传并更新封面图
    pub async fn update_cover(
        &self,
        user: User,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> AppResult<User> {
        self.update_image(user, bytes, filename, content_type, ImageKind::Cover)
            .await
    }

    async fn update_image(
        &self,
        mut user: User,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
        kind: ImageKind,
    ) -> AppResult<User> {
        if bytes.is_empty() {
            return Err(AppError::validation("Image file is required"));
        }

        let asset = self.media.upload_image(bytes, filename, content_type).await?;

        // TODO: delete the replaced asset once asset ids are persisted alongside URLs
        match kind {
            ImageKind::Avatar => user.set_avatar_url(asset.url),
            ImageKind::Cover => user.set_cover_image_url(asset.url),
        }

        self.user_repo.update(&user).await?;

        info!(user_id = %user.id, kind = ?kind, "Profile image updated");
        Ok(user)
    }
}

#[derive(Debug, Clone, Copy)]
enum ImageKind {
    Avatar,
    Cover,
}

// ============================================================
// 单元测试
// ============================================================
