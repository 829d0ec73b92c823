//! 媒体托管客户端实现

use crate::{MediaConfig, MediaStorage, UploadedAsset};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info};
use vireo_errors::{AppError, AppResult};

/// 媒体托管客户端
pub struct HttpMediaClient {
    config: MediaConfig,
    http: reqwest::Client,
}

impl HttpMediaClient {
    /// 创建新的媒体客户端
    pub fn new(config: MediaConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    fn asset_url(&self, asset_id: &str) -> String {
        format!("{}/{}", self.config.upload_url.trim_end_matches('/'), asset_id)
    }
}

#[async_trait::async_trait]
impl MediaStorage for HttpMediaClient {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> AppResult<UploadedAsset> {
        debug!(filename = %filename, size = bytes.len(), "Uploading image to media host");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::validation(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.config.upload_url)
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Media upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Media host returned status {}",
                response.status()
            )));
        }

        let asset: UploadedAsset = response.json().await.map_err(|e| {
            AppError::external_service(format!("Invalid media host response: {}", e))
        })?;

        info!(filename = %filename, url = %asset.url, "Image uploaded");
        Ok(asset)
    }

    async fn delete(&self, asset_id: &str) -> AppResult<()> {
        debug!(asset_id = %asset_id, "Deleting media asset");

        let response = self
            .http
            .delete(self.asset_url(asset_id))
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Media delete failed: {}", e)))?;

        // 资源已不存在时视为删除成功
        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(AppError::external_service(format!(
                "Media host returned status {}",
                response.status()
            )));
        }

        info!(asset_id = %asset_id, "Media asset deleted");
        Ok(())
    }
}
