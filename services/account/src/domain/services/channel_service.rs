//! 频道服务
//!
//! 频道聚合视图与订阅关系

use std::sync::Arc;

use tracing::info;
use vireo_common::UserId;
use vireo_errors::{AppError, AppResult};

use crate::domain::repositories::{SubscriptionRepository, UserRepository};
use crate::domain::subscription::ChannelProfile;
use crate::domain::value_objects::Username;

pub struct ChannelService {
    user_repo: Arc<dyn UserRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
}

impl ChannelService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            user_repo,
            subscription_repo,
        }
    }

    /// 频道聚合视图
    ///
    /// 匿名访问者的 is_subscribed 恒为 false
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer: Option<&UserId>,
    ) -> AppResult<ChannelProfile> {
        let username = Username::new(username)?;

        self.user_repo
            .find_channel_profile(&username, viewer)
            .await?
            .ok_or_else(|| AppError::not_found("Channel not found"))
    }

    /// 订阅/退订切换，返回新的订阅状态
    pub async fn toggle_subscription(
        &self,
        viewer: &UserId,
        channel_username: &str,
    ) -> AppResult<bool> {
        let username = Username::new(channel_username)?;

        let channel = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::not_found("Channel not found"))?;

        if &channel.id == viewer {
            return Err(AppError::validation("Cannot subscribe to your own channel"));
        }

        let subscribed = if self
            .subscription_repo
            .is_subscribed(viewer, &channel.id)
            .await?
        {
            self.subscription_repo
                .unsubscribe(viewer, &channel.id)
                .await?;
            false
        } else {
            self.subscription_repo
                .subscribe(viewer, &channel.id)
                .await?;
            true
        };

        info!(
            viewer = %viewer,
            channel = %channel.username,
            subscribed = subscribed,
            "Subscription toggled"
        );

        Ok(subscribed)
    }
}

// ============================================================
// 单元测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockSubscriptionRepository, MockUserRepository};
    use crate::domain::user::User;
    use crate::domain::value_objects::{Email, HashedPassword};

    fn channel_user() -> User {
        User::new(
            Username::new("bob").unwrap(),
            Email::new("bob@x.com").unwrap(),
            HashedPassword::from_hash("$argon2id$test".to_string()),
            "Bob".to_string(),
        )
    }

    fn profile() -> ChannelProfile {
        ChannelProfile {
            username: "bob".to_string(),
            display_name: "Bob".to_string(),
            avatar_url: None,
            cover_image_url: None,
            subscriber_count: 2,
            subscribed_to_count: 1,
            is_subscribed: true,
        }
    }

    #[tokio::test]
    async fn test_channel_profile_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_channel_profile()
            .returning(|_, _| Ok(Some(profile())));

        let service = ChannelService::new(
            Arc::new(user_repo),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let viewer = UserId::new();
        let profile = service
            .channel_profile("Bob", Some(&viewer))
            .await
            .unwrap();

        assert_eq!(profile.username, "bob");
        assert_eq!(profile.subscriber_count, 2);
        assert!(profile.is_subscribed);
    }

    #[tokio::test]
    async fn test_channel_profile_unknown_channel() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_channel_profile()
            .returning(|_, _| Ok(None));

        let service = ChannelService::new(
            Arc::new(user_repo),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let err = service.channel_profile("ghost", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_subscribes_when_absent() {
        let channel = channel_user();

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(channel.clone())));

        let mut sub_repo = MockSubscriptionRepository::new();
        sub_repo.expect_is_subscribed().returning(|_, _| Ok(false));
        sub_repo.expect_subscribe().times(1).returning(|_, _| Ok(()));

        let service = ChannelService::new(Arc::new(user_repo), Arc::new(sub_repo));

        let viewer = UserId::new();
        let subscribed = service.toggle_subscription(&viewer, "bob").await.unwrap();

        assert!(subscribed);
    }

    #[tokio::test]
    async fn test_toggle_unsubscribes_when_present() {
        let channel = channel_user();

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(channel.clone())));

        let mut sub_repo = MockSubscriptionRepository::new();
        sub_repo.expect_is_subscribed().returning(|_, _| Ok(true));
        sub_repo
            .expect_unsubscribe()
            .times(1)
            .returning(|_, _| Ok(true));

        let service = ChannelService::new(Arc::new(user_repo), Arc::new(sub_repo));

        let viewer = UserId::new();
        let subscribed = service.toggle_subscription(&viewer, "bob").await.unwrap();

        assert!(!subscribed);
    }

    #[tokio::test]
    async fn test_toggle_own_channel_rejected() {
        let channel = channel_user();
        let owner_id = channel.id.clone();

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(channel.clone())));

        let service = ChannelService::new(
            Arc::new(user_repo),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let err = service
            .toggle_subscription(&owner_id, "bob")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_unknown_channel() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(|_| Ok(None));

        let service = ChannelService::new(
            Arc::new(user_repo),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let viewer = UserId::new();
        let err = service
            .toggle_subscription(&viewer, "ghost")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
