//! 订阅实体与频道视图

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vireo_common::UserId;

/// 订阅 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// 订阅关系（频道即用户）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subscriber_id: UserId,
    pub channel_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(subscriber_id: UserId, channel_id: UserId) -> Self {
        Self {
            id: SubscriptionId::new(),
            subscriber_id,
            channel_id,
            created_at: Utc::now(),
        }
    }
}

/// 频道聚合视图（读模型）
///
/// 由 users × subscriptions 的单条聚合查询产出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subscription() {
        let subscriber = UserId::new();
        let channel = UserId::new();

        let subscription = Subscription::new(subscriber.clone(), channel.clone());

        assert_eq!(subscription.subscriber_id, subscriber);
        assert_eq!(subscription.channel_id, channel);
    }

    #[test]
    fn test_subscription_ids_unique() {
        let a = SubscriptionId::new();
        let b = SubscriptionId::new();

        assert_ne!(a, b);
    }
}
