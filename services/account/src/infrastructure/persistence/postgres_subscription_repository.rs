//! PostgreSQL 订阅 Repository 实现

use async_trait::async_trait;
use sqlx::PgPool;
use vireo_common::UserId;
use vireo_errors::{AppError, AppResult};

use crate::domain::repositories::SubscriptionRepository;
use crate::domain::subscription::Subscription;

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn subscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<()> {
        let subscription = Subscription::new(subscriber.clone(), channel.clone());

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subscriber_id, channel_id) DO NOTHING
            "#,
        )
        .bind(subscription.id.0)
        .bind(subscription.subscriber_id.0)
        .bind(subscription.channel_id.0)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to subscribe: {}", e)))?;

        Ok(())
    }

    async fn unsubscribe(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
                .bind(subscriber.0)
                .bind(channel.0)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to unsubscribe: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_subscribed(&self, subscriber: &UserId, channel: &UserId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM subscriptions
             WHERE subscriber_id = $1 AND channel_id = $2)",
        )
        .bind(subscriber.0)
        .bind(channel.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check subscription: {}", e)))?;

        Ok(exists)
    }
}
