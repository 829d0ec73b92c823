//! Vireo Account Service - 账户服务入口

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use vireo_account::api::{self, AppState, OpsState};
use vireo_account::domain::repositories::{SubscriptionRepository, UserRepository};
use vireo_account::domain::services::{AccountService, ChannelService, SessionService};
use vireo_account::infrastructure::persistence::{
    PostgresSubscriptionRepository, PostgresUserRepository, create_pool, ensure_schema,
};
use vireo_adapter_media::{HttpMediaClient, MediaStorage};
use vireo_auth_core::TokenService;
use vireo_config::AppConfig;
use vireo_telemetry::{init_metrics, init_tracing, init_tracing_json};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config = AppConfig::load("config")?;

    // 初始化 tracing
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    // 初始化 Prometheus metrics
    let metrics_handle = init_metrics();

    info!(app = %config.app_name, env = %config.app_env, "Starting account service");

    // 数据库连接池与结构引导
    let pool = create_pool(&config.database).await?;
    ensure_schema(&pool).await?;

    // Token Codec
    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in,
        config.jwt.refresh_expires_in,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    ));

    // 媒体托管客户端
    let media: Arc<dyn MediaStorage> = Arc::new(HttpMediaClient::new(
        vireo_adapter_media::MediaConfig {
            upload_url: config.media.upload_url.clone(),
            api_key: config.media.api_key.clone(),
            timeout_secs: config.media.timeout_secs,
        },
    )?);

    // 组装 Repositories（依赖 domain trait）
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let subscription_repo: Arc<dyn SubscriptionRepository> =
        Arc::new(PostgresSubscriptionRepository::new(pool.clone()));

    // 组装领域服务
    let session_service = Arc::new(SessionService::new(
        user_repo.clone(),
        token_service.clone(),
    ));
    let account_service = Arc::new(AccountService::new(user_repo.clone(), media));
    let channel_service = Arc::new(ChannelService::new(user_repo, subscription_repo));

    let state = AppState {
        session_service,
        account_service,
        channel_service,
        token_service,
    };

    let ops_state = OpsState {
        pool,
        metrics: metrics_handle,
    };

    // 构建路由
    let app = api::routes(state)
        .merge(api::ops_routes(ops_state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive());

    // 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// 等待关闭信号
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections");
}
