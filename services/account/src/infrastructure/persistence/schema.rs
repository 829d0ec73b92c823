//! 数据库结构引导
//!
//! 启动时执行幂等 DDL，保证 users 与 subscriptions 两张表存在

use sqlx::PgPool;
use tracing::info;
use vireo_errors::{AppError, AppResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        display_name TEXT NOT NULL,
        avatar_url TEXT,
        cover_image_url TEXT,
        refresh_token TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id UUID PRIMARY KEY,
        subscriber_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        channel_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        UNIQUE (subscriber_id, channel_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_subscriptions_channel_id
        ON subscriptions (channel_id)
    "#,
];

/// 应用数据库结构
pub async fn ensure_schema(pool: &PgPool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::database(format!("Schema bootstrap failed: {}", e)))?;
    }

    info!("Database schema ensured");
    Ok(())
}
