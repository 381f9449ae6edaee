use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, signal};
use tracing::info;

use crate::{api, management::SearchProxy};

pub fn router(proxy: Arc<SearchProxy>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/search", get(api::search))
        .layer(Extension(proxy))
}

/// Serves the proxy on `listener` until Ctrl+C or SIGTERM.
pub async fn start_api_server(
    listener: TcpListener,
    proxy: Arc<SearchProxy>,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server running on {addr}");
    }

    axum::serve(listener, router(proxy))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
