//! Media 适配器
//!
//! 封装第三方媒体托管服务的上传/删除接口

mod client;

pub use client::HttpMediaClient;

use secrecy::Secret;
use serde::Deserialize;
use vireo_errors::AppResult;

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub upload_url: String,
    pub api_key: Secret<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// 托管服务返回的媒体资源
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub url: String,
    pub asset_id: String,
}

/// 媒体存储接口
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// 上传图片，返回托管 URL 与资源 ID
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> AppResult<UploadedAsset>;

    /// 删除已上传的资源
    async fn delete(&self, asset_id: &str) -> AppResult<()>;
}
