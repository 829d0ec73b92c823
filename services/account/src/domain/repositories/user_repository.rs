//! 用户 Repository trait

use async_trait::async_trait;
use vireo_common::UserId;
use vireo_errors::AppResult;

use crate::domain::subscription::ChannelProfile;
use crate::domain::user::User;
use crate::domain::value_objects::{Email, HashedPassword, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &Username) -> AppResult<Option<User>>;

    /// 根据用户名或邮箱查找用户（登录标识符，单次查询）
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// 检查用户名是否存在
    async fn exists_by_username(&self, username: &Username) -> AppResult<bool>;

    /// 检查邮箱是否存在
    async fn exists_by_email(&self, email: &Email) -> AppResult<bool>;

    /// 创建用户（唯一键冲突映射为 Conflict）
    async fn create(&self, user: &User) -> AppResult<()>;

    /// 更新用户完整记录（资料变更）
    async fn update(&self, user: &User) -> AppResult<()>;

    /// 覆盖会话槽位的窄更新：只触碰 refresh_token 与 updated_at，
    /// 不触发完整记录校验
    async fn set_refresh_token(&self, id: &UserId, refresh_token: &str) -> AppResult<()>;

    /// 清空会话槽位（吊销哨兵值）
    async fn clear_refresh_token(&self, id: &UserId) -> AppResult<()>;

    /// 密码哈希的窄更新
    async fn update_password(&self, id: &UserId, password_hash: &HashedPassword) -> AppResult<()>;

    /// 频道聚合视图：单条查询产出订阅数、关注数与访问者订阅标记
    async fn find_channel_profile<'a>(
        &self,
        username: &Username,
        viewer: Option<&'a UserId>,
    ) -> AppResult<Option<ChannelProfile>>;
}
