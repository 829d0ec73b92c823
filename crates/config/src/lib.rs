//! vireo-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    // 根据环境自动调整连接池大小
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default = "default_refresh_expires_in")]
    pub refresh_expires_in: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_expires_in() -> i64 {
    3600
}

fn default_refresh_expires_in() -> i64 {
    604800
}

fn default_issuer() -> String {
    "vireo".to_string()
}

fn default_audience() -> String {
    "vireo-api".to_string()
}

/// 媒体托管配置
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub upload_url: String,
    pub api_key: Secret<String>,
    #[serde(default = "default_media_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_media_timeout_secs() -> u64 {
    30
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("").split("_"))
            .extract()?;

        config.validate()?;

        Ok(config)
    }

    /// 校验跨字段约束
    ///
    /// 访问令牌的有效期必须严格短于刷新令牌的有效期
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.expires_in <= 0 {
            return Err(ConfigError::Invalid(
                "jwt.expires_in must be positive".to_string(),
            ));
        }
        if self.jwt.expires_in >= self.jwt.refresh_expires_in {
            return Err(ConfigError::Invalid(format!(
                "jwt.expires_in ({}) must be shorter than jwt.refresh_expires_in ({})",
                self.jwt.expires_in, self.jwt.refresh_expires_in
            )));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
