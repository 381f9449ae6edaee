use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{config::Config, error, management::SearchProxy, server::start_api_server};

/// Starts the proxy. `address` overrides `SERVER_ADDRESS`.
pub async fn serve(address: Option<String>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    if let Some(address) = address {
        config.server_address = address;
    }

    let proxy = match SearchProxy::new(&config) {
        Ok(proxy) => Arc::new(proxy),
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    };

    let listener = match TcpListener::bind(&config.server_address).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot bind to {}. Err: {}", config.server_address, e),
    };

    if let Err(e) = start_api_server(listener, proxy).await {
        error!("Server stopped unexpectedly. Err: {}", e);
    }
}
