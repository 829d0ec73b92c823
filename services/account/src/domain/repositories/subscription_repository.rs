//! 订阅 Repository trait

use async_trait::async_trait;
use vireo_common::UserId;
use vireo_errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// 建立订阅关系（已存在时为幂等）
    async fn subscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<()>;

    /// 解除订阅关系，返回是否确有删除
    async fn unsubscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool>;

    /// 检查订阅关系是否存在
    async fn is_subscribed(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool>;
}
