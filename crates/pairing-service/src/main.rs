//! WhatsApp pairing service - entry point.

use pairing_service::api::{create_router, AppState};
use pairing_service::config::Config;
use pairing_service::session::store::SessionStores;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wa_gateway_client::{GatewayClient, GatewayTransport, SessionOptions};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting WhatsApp pairing service");

    // Initialize gateway transport
    let client = match GatewayClient::new(
        &config.gateway.api_url,
        config.gateway.connect_timeout,
        config.gateway.query_timeout,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create gateway client: {}", e);
            std::process::exit(1);
        }
    };

    if !client.health_check().await {
        warn!("Gateway not reachable at {}", config.gateway.api_url);
    }

    let options = SessionOptions {
        device_label: config.gateway.device_label.clone(),
        mark_online: false,
        keep_alive: config.gateway.keep_alive,
    };
    let transport = GatewayTransport::new(client, options, config.gateway.poll_interval);

    // Initialize session store base
    let stores = SessionStores::new(config.store.base_dir.clone());
    info!(
        "Session stores under {}",
        config.store.base_dir.display()
    );

    // Create application state and router
    let state = AppState::new(Arc::new(transport), stores);
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
