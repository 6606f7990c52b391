//! gaugeportd — the gaugeport daemon.
//!
//! Loads the configuration and store credential, then serves the scrape
//! endpoint. Every scrape queries the metrics store from scratch.
//!
//! # Usage
//!
//! ```text
//! gaugeportd --config /etc/gaugeport/config.toml --port 8080
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gaugeport_collector::Collector;
use gaugeport_core::Config;
use gaugeport_store::{load_token, HttpStore};

#[derive(Parser)]
#[command(name = "gaugeportd", about = "Metrics store to Prometheus exporter")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "GAUGEPORT_CONFIG", default_value = "/etc/gaugeport/config.toml")]
    config: PathBuf,

    /// Port to listen on (overrides `exposition.port`).
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging for gaugeport crates.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.exposition.port = port;
    }

    // Initialize tracing.
    let default_filter = if cli.debug || config.debug {
        "info,gaugeport=debug"
    } else {
        "info,gaugeport=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("gaugeport starting");

    let token = load_token(&config.store.token_path)?;
    let store = HttpStore::new(&config.store, token)?;
    info!(
        base_url = %config.store.base_url(),
        concurrency = config.store.concurrency,
        "store client initialized"
    );

    if config.discover_tenants {
        info!("tenants resolved from the store on every scrape");
    } else {
        info!(tenants = ?config.tenants, "using configured tenants");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.exposition.port));
    let metrics_path = config.exposition.metrics_path.clone();
    let collector = Collector::new(Arc::new(store), Arc::new(config));
    let router = gaugeport_api::build_router(collector);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, path = %metrics_path, "scrape endpoint listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gaugeport stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
