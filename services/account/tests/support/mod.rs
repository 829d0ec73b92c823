//! 测试替身：内存版仓储与媒体存根
//!
//! 行为与 PostgreSQL 实现保持一致：update 只写资料字段，
//! 会话与凭证走各自的窄更新

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vireo_account::domain::repositories::{SubscriptionRepository, UserRepository};
use vireo_account::domain::subscription::ChannelProfile;
use vireo_account::domain::user::User;
use vireo_account::domain::value_objects::{Email, HashedPassword, Username};
use vireo_adapter_media::{MediaStorage, UploadedAsset};
use vireo_common::UserId;
use vireo_errors::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    subscriptions: Mutex<Vec<(UserId, UserId)>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 直接读取存储的会话槽位（测试断言用）
    pub fn stored_refresh_token(&self, id: &UserId) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == id)
            .and_then(|u| u.refresh_token.clone())
    }
}

pub struct InMemoryUserRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.as_str() == identifier || u.email.as_str() == identifier)
            .cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> AppResult<bool> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| &u.username == username))
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| &u.email == email))
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::conflict("Username already registered"));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already registered"));
        }

        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        stored.email = user.email.clone();
        stored.display_name = user.display_name.clone();
        stored.avatar_url = user.avatar_url.clone();
        stored.cover_image_url = user.cover_image_url.clone();
        stored.timestamps.updated_at = user.timestamps.updated_at;
        Ok(())
    }

    async fn set_refresh_token(&self, id: &UserId, refresh_token: &str) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        stored.refresh_token = Some(refresh_token.to_string());
        stored.timestamps.touch();
        Ok(())
    }

    async fn clear_refresh_token(&self, id: &UserId) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        stored.refresh_token = None;
        stored.timestamps.touch();
        Ok(())
    }

    async fn update_password(&self, id: &UserId, password_hash: &HashedPassword) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        stored.password_hash = password_hash.clone();
        stored.timestamps.touch();
        Ok(())
    }

    async fn find_channel_profile<'a>(
        &self,
        username: &Username,
        viewer: Option<&'a UserId>,
    ) -> AppResult<Option<ChannelProfile>> {
        let users = self.0.users.lock().unwrap();
        let subscriptions = self.0.subscriptions.lock().unwrap();

        let Some(channel) = users.iter().find(|u| &u.username == username) else {
            return Ok(None);
        };

        let subscriber_count = subscriptions
            .iter()
            .filter(|(_, c)| c == &channel.id)
            .count() as i64;
        let subscribed_to_count = subscriptions
            .iter()
            .filter(|(s, _)| s == &channel.id)
            .count() as i64;
        let is_subscribed = viewer
            .map(|v| {
                subscriptions
                    .iter()
                    .any(|(s, c)| s == v && c == &channel.id)
            })
            .unwrap_or(false);

        Ok(Some(ChannelProfile {
            username: channel.username.to_string(),
            display_name: channel.display_name.clone(),
            avatar_url: channel.avatar_url.clone(),
            cover_image_url: channel.cover_image_url.clone(),
            subscriber_count,
            subscribed_to_count,
            is_subscribed,
        }))
    }
}

pub struct InMemorySubscriptionRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn subscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<()> {
        let mut subscriptions = self.0.subscriptions.lock().unwrap();

        if !subscriptions
            .iter()
            .any(|(s, c)| s == subscriber && c == channel)
        {
            subscriptions.push((subscriber.clone(), channel.clone()));
        }
        Ok(())
    }

    async fn unsubscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool> {
        let mut subscriptions = self.0.subscriptions.lock().unwrap();
        let before = subscriptions.len();

        subscriptions.retain(|(s, c)| !(s == subscriber && c == channel));
        Ok(subscriptions.len() < before)
    }

    async fn is_subscribed(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool> {
        Ok(self
            .0
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .any(|(s, c)| s == subscriber && c == channel))
    }
}

/// 不触网的媒体存根
pub struct StubMedia;

#[async_trait]
impl MediaStorage for StubMedia {
    async fn upload_image(
        &self,
        _bytes: Vec<u8>,
        filename: &str,
        _content_type: &str,
    ) -> AppResult<UploadedAsset> {
        Ok(UploadedAsset {
            url: format!("https://media.test/{}", filename),
            asset_id: format!("asset-{}", filename),
        })
    }

    async fn delete(&self, _asset_id: &str) -> AppResult<()> {
        Ok(())
    }
}
