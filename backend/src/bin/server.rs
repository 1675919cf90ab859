//! TVSL Guide HTTP Server Binary
//!
//! This is the main entry point for the guide REST API server.
//! It loads the configuration, performs the initial listings load, starts the
//! feed watcher, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! LISTINGS_FILE=/srv/tvsl/listings.xml cargo run --bin tvsl-server
//! ```
//!
//! # Environment Variables
//!
//! - `GUIDE_CONFIG`: Explicit path to `guide.toml`
//! - `LISTINGS_FILE`: XMLTV listings file (required unless set in the config file)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `POLL_INTERVAL_SECS`: Feed change polling interval (default: 5)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tvsl_guide::config::GuideConfig;
use tvsl_guide::feed::{FeedSource, FeedWatcher, FileFeedSource};
use tvsl_guide::http::{create_router, AppState};
use tvsl_guide::store::ListingsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting TVSL Guide HTTP Server");

    let config = GuideConfig::load().context("Failed to load configuration")?;
    let listings_file = config
        .listings
        .file
        .clone()
        .context("Listings file missing from validated configuration")?;

    let source: Arc<dyn FeedSource> = Arc::new(FileFeedSource::new(listings_file.clone()));
    let store = Arc::new(ListingsStore::new(source));
    let watcher = Arc::new(FeedWatcher::new(Arc::clone(&store), config.poll_interval()));
    info!(
        "Listings file {} (polled every {:?})",
        listings_file.display(),
        watcher.interval()
    );

    // Prime before loading so a write during the initial load is not missed
    let initial = {
        let store = Arc::clone(&store);
        let watcher = Arc::clone(&watcher);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watcher.prime() {
                warn!("Could not fingerprint listings source: {}", e);
            }
            store.refresh()
        })
        .await?
    };
    match initial {
        Ok(outcome) => info!("Initial listings load: {:?}", outcome),
        // Keep serving; requests answer NOT_READY until the watcher succeeds
        Err(e) => warn!("Initial listings load failed: {}", e),
    }

    let watcher_task = Arc::clone(&watcher).spawn();

    // Create application state
    let state = AppState::new(Arc::clone(&store), config.grid.clone());

    // Create router with all endpoints
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Guide endpoint: http://{}/v1/guide", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    watcher_task.abort();
    info!("Server stopped");

    Ok(())
}
