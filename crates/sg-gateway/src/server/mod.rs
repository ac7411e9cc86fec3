//! HTTP and WebSocket server
//!
//! Every route lives under `/api`:
//!
//! | Method | Path                   | Purpose                          |
//! |--------|------------------------|----------------------------------|
//! | GET    | `/api/`                | service banner                   |
//! | POST   | `/api/ssh/execute`     | run a command and wait for it    |
//! | GET    | `/api/ssh/logs`        | recent audit records             |
//! | GET    | `/api/ws/:client_id`   | session channel (WebSocket)      |
//! | GET    | `/api/config/:name`    | fetch a control-panel document   |
//! | POST   | `/api/config/validate` | structural document check        |

mod error;
mod routes;
mod ws;

pub use error::ApiError;
pub use routes::router;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::state::GatewayState;

/// Serves the gateway API on one address
pub struct GatewayServer {
    /// Address to bind
    pub address: String,
    /// Shared state
    state: Arc<GatewayState>,
    /// Cancellation token for shutdown
    shutdown_token: Option<CancellationToken>,
}

impl GatewayServer {
    /// Create a new server
    pub fn new(address: String, state: Arc<GatewayState>) -> Self {
        Self {
            address,
            state,
            shutdown_token: None,
        }
    }

    /// Set the shutdown token (call before run)
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown_token = Some(token);
        self
    }

    /// Bind and serve until the shutdown token fires
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.address)
            .await
            .with_context(|| format!("Failed to bind gateway server to {}", self.address))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .context("Failed to read listener address")?;
        tracing::info!("Gateway listening on {}", local_addr);

        let shutdown = self.shutdown_token.clone().unwrap_or_default();
        axum::serve(listener, router(Arc::clone(&self.state)))
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .context("Gateway server failed")?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}
