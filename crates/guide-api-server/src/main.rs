use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use guide_api_server::config::Settings;
use guide_api_server::services::{spawn_sweeper, ConversationManager};
use guide_api_server::utils::logger::init_logger;
use guide_api_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    init_logger(&settings.logging)?;
    info!("🚀 Starting guide API server...");
    info!("✅ Configuration loaded");

    // Conversation engine + periodic staleness sweep
    let manager = Arc::new(ConversationManager::with_stale_after(
        settings.conversation.stale_after(),
    ));
    let sweeper = spawn_sweeper(manager.clone(), settings.conversation.sweep_interval());
    info!("✅ Conversation sweeper started");

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    let app = build_router(AppState::new(manager, settings));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    sweeper.abort();
    Ok(())
}
