//! term-relay gateway entry point.
//!
//! Starts the Axum HTTP server with the static terminal page, REST
//! endpoints, and the WebSocket relay routes.

use tracing_subscriber::EnvFilter;

use term_relay::app_state::AppState;
use term_relay::config::{LogFormat, RelayConfig};
use term_relay::router::build_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        terminal_upstream = %config.terminal_upstream,
        dial_enabled = config.dial_enabled,
        "starting term-relay"
    );

    let listen_addr = config.listen_addr;
    let app = build_app(AppState::new(config));

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
