//! REST resource router (v1)
//!
//! Serves the sample orders API through the resource router.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::dispatch ──▶ routing::Router
//!                     (request id,     (body limit,       (segment bucket,
//!                      timeout,         router choice)     regex match)
//!                      trace)                                   │
//!                                                               ▼
//!     Client Response                                     bound handler
//!     ◀────────────── JSON / HttpError ◀───────────────── (app::handlers)
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rest_router::app::{self, OrderStore};
use rest_router::config::{load_config, RouterConfig};
use rest_router::http::{Dispatcher, HttpServer};
use rest_router::lifecycle::{wait_for_signal, Shutdown};
use rest_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "rest-router")]
#[command(about = "Serve the sample orders API", long_about = None)]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("rest-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_bytes = config.listener.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        base_url = config.api.base_url.as_deref().unwrap_or("<from Host header>"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to install metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = app::orders_api(Arc::new(OrderStore::new()))?;
    tracing::info!(operations = router.len(), "Routes compiled");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        wait_for_signal(&signal_shutdown).await;
    });

    let server = HttpServer::new(config, Dispatcher::single(router));
    server.run(listener, shutdown.wait()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
