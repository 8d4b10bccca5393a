use std::sync::Arc;

use cpu_monitor_mcp::{
    build_app,
    config::Config,
    logging,
    mcp::envelope::{MCP_PROTOCOL, MCP_VERSION},
    metrics::SysinfoCpuProvider,
    AppState,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let logging = logging::init_logging(config.log_file.as_deref())?;

    let provider = Arc::new(SysinfoCpuProvider::new(
        config.sample_interval,
        config.timestamp_offset,
    ));
    let bind_socket = config.bind_socket()?;
    let app = build_app(AppState::new(provider));
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        protocol = MCP_PROTOCOL,
        version = MCP_VERSION,
        "server starting"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    logging.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
