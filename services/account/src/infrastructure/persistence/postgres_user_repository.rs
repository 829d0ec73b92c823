//! PostgreSQL 用户 Repository 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vireo_common::{Timestamps, UserId};
use vireo_errors::{AppError, AppResult};

use crate::domain::repositories::UserRepository;
use crate::domain::subscription::ChannelProfile;
use crate::domain::user::User;
use crate::domain::value_objects::{Email, HashedPassword, Username};

const USER_COLUMNS: &str = "id, username, email, password_hash, display_name, avatar_url, \
                            cover_image_url, refresh_token, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    display_name: String,
    avatar_url: Option<String>,
    cover_image_url: Option<String>,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            username: Username(self.username),
            email: Email(self.email),
            password_hash: HashedPassword::from_hash(self.password_hash),
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            refresh_token: self.refresh_token,
            timestamps: Timestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChannelProfileRow {
    username: String,
    display_name: String,
    avatar_url: Option<String>,
    cover_image_url: Option<String>,
    subscriber_count: i64,
    subscribed_to_count: i64,
    is_subscribed: bool,
}

impl ChannelProfileRow {
    fn into_profile(self) -> ChannelProfile {
        ChannelProfile {
            username: self.username,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            subscriber_count: self.subscriber_count,
            subscribed_to_count: self.subscribed_to_count,
            is_subscribed: self.is_subscribed,
        }
    }
}

/// 唯一键冲突映射为 Conflict，其余映射为 Database
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_username_key") => "Username",
                Some("users_email_key") => "Email",
                _ => "User",
            };
            return AppError::conflict(format!("{} already registered", field));
        }
    }
    AppError::database(format!("Failed to write user: {}", e))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find user: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find user: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $1",
            USER_COLUMNS
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find user: {}", e)))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_username(&self, username: &Username) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check username: {}", e)))?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check email: {}", e)))?;

        Ok(exists)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, display_name, avatar_url,
                               cover_image_url, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(&user.cover_image_url)
        .bind(&user.refresh_token)
        .bind(user.timestamps.created_at)
        .bind(user.timestamps.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        // 资料字段；会话与凭证字段走各自的窄更新
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, display_name = $3, avatar_url = $4, cover_image_url = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(&user.cover_image_url)
        .bind(user.timestamps.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn set_refresh_token(&self, id: &UserId, refresh_token: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = $3 WHERE id = $1")
            .bind(id.0)
            .bind(refresh_token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update refresh token: {}", e)))?;

        Ok(())
    }

    async fn clear_refresh_token(&self, id: &UserId) -> AppResult<()> {
        sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear refresh token: {}", e)))?;

        Ok(())
    }

    async fn update_password(&self, id: &UserId, password_hash: &HashedPassword) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {}", e)))?;

        Ok(())
    }

    async fn find_channel_profile<'a>(
        &self,
        username: &Username,
        viewer: Option<&'a UserId>,
    ) -> AppResult<Option<ChannelProfile>> {
        let row = sqlx::query_as::<_, ChannelProfileRow>(
            r#"
            SELECT u.username, u.display_name, u.avatar_url, u.cover_image_url,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id)
                       AS subscriber_count,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id)
                       AS subscribed_to_count,
                   CASE WHEN $2::uuid IS NULL THEN FALSE
                        ELSE EXISTS (SELECT 1 FROM subscriptions s
                                     WHERE s.channel_id = u.id AND s.subscriber_id = $2)
                   END AS is_subscribed
            FROM users u
            WHERE u.username = $1
            "#,
        )
        .bind(username.as_str())
        .bind(viewer.map(|v| v.0))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load channel profile: {}", e)))?;

        Ok(row.map(ChannelProfileRow::into_profile))
    }
}
