//! # Sales API Server
//!
//! ## Usage
//! ```bash
//! # Defaults: 0.0.0.0:5000, ./salesdesk.db
//! cargo run -p sales-api
//!
//! # Explicit config file
//! cargo run -p sales-api -- --config ./sales-api.toml
//!
//! # Verbose engine logs
//! RUST_LOG=info,sales_api=debug cargo run -p sales-api
//! ```
//!
//! Populate the store first with the `seed` binary from salesdesk-db.

use anyhow::{bail, Context};
use sales_api::{build_router, ApiConfig, AppState};
use salesdesk_db::{Database, DbConfig};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,salesdesk=debug,sales_api=debug,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Salesdesk sales API...");

    let config = ApiConfig::load(config_path_arg()?).context("loading configuration")?;
    let addr = config.socket_addr()?;

    let db = Database::new(DbConfig::new(&config.db_path))
        .await
        .with_context(|| format!("opening database {}", config.db_path.display()))?;

    match db.sales_records().count().await {
        Ok(0) => warn!("Record store is empty; run the seed binary to load data"),
        Ok(count) => info!(records = count, "Record store ready"),
        Err(e) => warn!(error = %e, "Could not count stored records"),
    }

    let app = build_router(AppState::new(db.clone(), config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(%addr, "Sales API listening");
    info!("  Health check:   http://{}/health", addr);
    info!("  Sales data:     http://{}/api/sales", addr);
    info!("  Filter options: http://{}/api/sales/filters", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins; otherwise the service's own crates log at debug.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();
}

/// Reads `--config <path>` from the command line.
fn config_path_arg() -> anyhow::Result<Option<PathBuf>> {
    let mut argv = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" | "-c" => match argv.next() {
                Some(value) => path = Some(PathBuf::from(value)),
                None => bail!("--config needs a path"),
            },
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(path)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
