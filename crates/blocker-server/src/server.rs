use std::sync::Arc;

use tokio::net::TcpListener;

use blocker_store::DiskBlobStore;
use blocker_types::MAX_BLOB_SIZE;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::service::BlobService;
use crate::state::AppState;

/// Blocker HTTP server backed by a [`DiskBlobStore`].
pub struct BlockerServer {
    config: ServerConfig,
}

impl BlockerServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured store and build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        self.config.validate()?;
        let store = DiskBlobStore::open(&self.config.data_dir, self.config.store_options())?;
        let service = BlobService::new(Arc::new(store));
        Ok(build_router(AppState::new(service)))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            data_dir = %self.config.data_dir.display(),
            max_blob_size = MAX_BLOB_SIZE,
            "Blocker server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
