//! Hub server binary: load config, spawn the idle reaper, serve HTTP.
//!
//! Logging: set `RUST_LOG=hub_server=debug` (or `info`, `warn`) to control
//! log output on stderr.

use clap::Parser;
use hub_core::HubConfig;
use hub_server::state::AppState;
use hub_session::IdleReaper;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hub-server")]
#[command(about = "Multi-user agent session hub over HTTP.")]
struct Cli {
    /// Path to the hub config file (JSON); built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address override (e.g. 0.0.0.0:8000).
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &cli.config {
        Some(path) => HubConfig::load(path)?,
        None => HubConfig::default(),
    };
    let bind = cli
        .bind
        .clone()
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    let state = AppState::new(config);
    let reaper = IdleReaper::spawn(
        Arc::clone(&state.store),
        Duration::from_secs(state.config.reap_interval_secs),
        Duration::from_secs(state.config.idle_timeout_secs),
    );
    let app = hub_server::app_with_state(state);

    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("hub listening on {bind} (Ctrl+C/SIGTERM to stop)");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    reaper.shutdown();
    tracing::info!("hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let ctrl_c = tokio::signal::ctrl_c();
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to listen for SIGTERM");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for Ctrl+C");
    }
}
