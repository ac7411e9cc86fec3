//! sshgate gateway daemon
//!
//! Serves the control-panel API: a WebSocket session channel and HTTP
//! endpoints that run commands on remote hosts over SSH.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sg_core::config::{self, GatewayConfig};
use sg_gateway::{GatewayServer, GatewayState};

#[derive(Parser)]
#[command(name = "sg-gateway")]
#[command(about = "sshgate remote command gateway")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// SQLite audit database (overrides config)
    #[arg(long, env = "SSHGATE_AUDIT_DB")]
    audit_db: Option<PathBuf>,

    /// Directory of control-panel documents (overrides config)
    #[arg(long, env = "SSHGATE_DOCUMENTS_DIR")]
    documents_dir: Option<PathBuf>,

    /// Run in foreground with verbose output
    #[arg(short, long)]
    foreground: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.foreground { "debug" } else { &args.log_level };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("sshgate gateway starting...");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(path) = args.audit_db {
        config.audit.path = Some(path);
    }
    if let Some(dir) = args.documents_dir {
        config.documents_dir = dir;
    }

    tracing::info!(
        "Timeouts: connect {}s, command {}s",
        config.connect_timeout.as_secs(),
        config.command_timeout.as_secs()
    );
    tracing::info!("Serving documents from {:?}", config.documents_dir);

    let bind_addr = config.bind_address.clone();
    let state = Arc::new(GatewayState::from_config(config).context("Failed to initialize gateway")?);

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    // Setup signal handlers
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel_clone.cancel();
    });

    let server = GatewayServer::new(bind_addr, Arc::clone(&state)).with_shutdown_token(cancel);
    server.run().await?;

    let in_flight = state.dispatcher.in_flight();
    if in_flight > 0 {
        tracing::warn!("Shutting down with {} executions still running", in_flight);
    }
    tracing::info!("Gateway shutdown complete");
    Ok(())
}

/// Explicit path must load; the default path is optional
fn load_config(path: Option<&std::path::Path>) -> Result<GatewayConfig> {
    if let Some(config_path) = path {
        return config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(config::load_config(&default_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
            GatewayConfig::default()
        }))
    } else {
        tracing::info!("Using default configuration");
        Ok(GatewayConfig::default())
    }
}
