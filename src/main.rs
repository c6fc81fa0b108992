use file_gateway::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

/// 未设置 RUST_LOG 时使用的日志级别
const DEFAULT_LOG_FILTER: &str = "info,file_gateway=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_timer(LocalTime::rfc_3339())
        .init();

    let config = Config::from_env()?;
    let state = file_gateway::connect(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("服务器运行在 http://{}", config.listen_addr);

    axum::serve(listener, file_gateway::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
