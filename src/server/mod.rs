//! HTTP server implementation
//!
//! Sets up the Axum HTTP server with:
//! - The gateway routes
//! - Request tracing middleware
//! - Graceful shutdown
//!
//! The router is an explicit value built at startup and handed to
//! `axum::serve`; there is no global registry. Requests are served with
//! connect-info so handlers can log the peer address.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::routes;
use crate::storage::StorageBackend;

/// HTTP server for the gateway.
pub struct Server {
    bind_address: SocketAddr,
    storage: Arc<dyn StorageBackend>,
}

impl Server {
    /// Create a new server instance listening on the configured port.
    pub fn new(config: &Config, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], config.port)),
            storage,
        }
    }

    /// Build the Axum router with middleware.
    fn build_router(&self) -> Router {
        routes::create_router(self.storage.clone())
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).into_inner())
    }

    /// Start the server and run until the shutdown future resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.bind_address).await?;
        info!(address = %self.bind_address, "Server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        Ok(())
    }
}
