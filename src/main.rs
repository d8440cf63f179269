// SPDX-License-Identifier: GPL-3.0-only
mod api;
mod catalog;
mod collection;
mod config;
mod generation;
mod logging;
mod publish;
mod synchronizer;
#[cfg(test)]
mod test_helpers;
mod utils;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use api::HttpServer;
use catalog::CatalogStore;
use collection::{BackendCollectionService, CollectionService};
use config::Config;
use generation::{GeminiClient, GenerationService};
use logging::setup_logging;
use publish::PublishService;
use synchronizer::CatalogSynchronizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level, config.log_json)?;

    info!("Starting SalimzStoreDaemon v{}", env!("CARGO_PKG_VERSION"));

    // Construct the injected service clients
    let store = Arc::new(CatalogStore::new());
    let collection: Arc<dyn CollectionService> =
        Arc::new(BackendCollectionService::new(&config)?);
    let generation: Arc<dyn GenerationService> = Arc::new(GeminiClient::new(&config)?);
    let publisher = Arc::new(PublishService::new(Arc::clone(&collection)));

    // Start mirroring the remote listing collection. Connection failures are
    // not fatal here: the subscription keeps retrying with backoff and the
    // catalog serves as loading/stale until it goes live.
    let synchronizer = CatalogSynchronizer::new(Arc::clone(&store), Arc::clone(&collection));
    let sync_handle = synchronizer.start().await?;
    info!(collection = %config.collection_name, "Catalog mirror started");

    // Start the local display-layer API
    let http_server = HttpServer::new(
        Arc::clone(&store),
        publisher,
        generation,
        Arc::clone(&collection),
        config.local_api_bind,
    );
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.serve().await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("All services started. Waiting for shutdown signal...");

    // Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    // Graceful shutdown: releasing the sync handle terminates the standing
    // subscription
    info!("Initiating graceful shutdown...");

    sync_handle.stop();
    http_task.abort();

    info!("Shutdown complete");
    Ok(())
}
