//! 用户实体

use serde::{Deserialize, Serialize};
use vireo_common::{Timestamps, UserId};

use crate::domain::value_objects::{Email, HashedPassword, Username};

/// 用户实体
///
/// `refresh_token` 是唯一的会话材料：每个用户至多持有一个有效的
/// 刷新令牌，登录/刷新时整体覆盖，登出时清空为 `None`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub refresh_token: Option<String>,
    pub timestamps: Timestamps,
}

impl User {
    pub fn new(
        username: Username,
        email: Email,
        password_hash: HashedPassword,
        display_name: String,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            display_name,
            avatar_url: None,
            cover_image_url: None,
            refresh_token: None,
            timestamps: Timestamps::new(),
        }
    }

    pub fn update_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.timestamps.touch();
    }

    pub fn rename(&mut self, display_name: String) {
        self.display_name = display_name;
        self.timestamps.touch();
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = email;
        self.timestamps.touch();
    }

    pub fn set_avatar_url(&mut self, url: String) {
        self.avatar_url = Some(url);
        self.timestamps.touch();
    }

    pub fn set_cover_image_url(&mut self, url: String) {
        self.cover_image_url = Some(url);
        self.timestamps.touch();
    }

    /// 覆盖会话槽位（上一个刷新令牌随之失效）
    pub fn rotate_refresh_token(&mut self, refresh_token: String) {
        self.refresh_token = Some(refresh_token);
        self.timestamps.touch();
    }

    /// 清空会话槽位
    pub fn revoke_refresh_token(&mut self) {
        self.refresh_token = None;
        self.timestamps.touch();
    }

    pub fn has_active_session(&self) -> bool {
        self.refresh_token.is_some()
    }
}

// ============================================================
// 单元测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        let username = Username::new("testuser").unwrap();
        let email = Email::new("test@example.com").unwrap();
        let password_hash = HashedPassword::from_hash("$argon2id$test_hash".to_string());

        User::new(username, email, password_hash, "Test User".to_string())
    }

    #[test]
    fn test_create_user() {
        let user = create_test_user();

        assert_eq!(user.display_name, "Test User");
        assert!(user.avatar_url.is_none());
        assert!(user.cover_image_url.is_none());
        assert!(user.refresh_token.is_none());
        assert!(!user.has_active_session());
    }

    #[test]
    fn test_rotate_refresh_token_overwrites_slot() {
        let mut user = create_test_user();

        user.rotate_refresh_token("first".to_string());
        assert_eq!(user.refresh_token.as_deref(), Some("first"));

        user.rotate_refresh_token("second".to_string());
        assert_eq!(user.refresh_token.as_deref(), Some("second"));
        assert!(user.has_active_session());
    }

    #[test]
    fn test_revoke_refresh_token() {
        let mut user = create_test_user();
        user.rotate_refresh_token("token".to_string());

        user.revoke_refresh_token();

        assert!(user.refresh_token.is_none());
        assert!(!user.has_active_session());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let mut user = create_test_user();

        user.revoke_refresh_token();
        user.revoke_refresh_token();

        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn test_update_password() {
        let mut user = create_test_user();

        let new_hash = HashedPassword::from_hash("$argon2id$new_hash".to_string());
        user.update_password(new_hash.clone());

        assert_eq!(user.password_hash, new_hash);
    }

    #[test]
    fn test_profile_mutations_touch_timestamps() {
        let mut user = create_test_user();
        let before = user.timestamps.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        user.rename("New Name".to_string());

        assert_eq!(user.display_name, "New Name");
        assert!(user.timestamps.updated_at > before);
    }

    #[test]
    fn test_set_media_urls() {
        let mut user = create_test_user();

        user.set_avatar_url("https://media.example.com/a.png".to_string());
        user.set_cover_image_url("https://media.example.com/c.png".to_string());

        assert!(user.avatar_url.is_some());
        assert!(user.cover_image_url.is_some());
    }
}
