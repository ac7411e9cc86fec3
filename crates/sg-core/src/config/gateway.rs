//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::duration_secs;
use crate::error::ConfigError;

/// Configuration for the gateway daemon.
///
/// Loaded once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address the HTTP/WebSocket server binds to
    pub bind_address: String,

    /// Bound on TCP connect, SSH handshake and authentication
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,

    /// Bound on running the remote command and collecting its output
    #[serde(with = "duration_secs")]
    pub command_timeout: Duration,

    /// Audit store settings
    pub audit: AuditConfig,

    /// Directory holding `<name>.json` control-panel documents
    pub documents_dir: PathBuf,

    /// Cross-origin policy for browser clients
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let config_dir = super::default_config_dir();

        Self {
            bind_address: "0.0.0.0:8001".to_string(),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
            audit: AuditConfig::default(),
            documents_dir: config_dir.join("documents"),
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Reject configurations the daemon cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid("connect_timeout must be positive".into()));
        }
        if self.command_timeout.is_zero() {
            return Err(ConfigError::Invalid("command_timeout must be positive".into()));
        }
        if self.audit.default_limit > self.audit.max_limit {
            return Err(ConfigError::Invalid(format!(
                "audit.default_limit ({}) exceeds audit.max_limit ({})",
                self.audit.default_limit, self.audit.max_limit
            )));
        }
        Ok(())
    }
}

/// Audit store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// SQLite database path; when unset, records are kept in memory only
    pub path: Option<PathBuf>,

    /// Records returned by the log query when no limit is given
    pub default_limit: usize,

    /// Upper bound on any requested limit
    pub max_limit: usize,

    /// Records retained by the in-memory store
    pub memory_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_limit: 50,
            max_limit: 1000,
            memory_capacity: 10_000,
        }
    }
}

impl AuditConfig {
    /// Resolve a client-requested limit against the configured default and cap
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

/// Cross-origin resource sharing policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    /// Whether any origin is allowed
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
