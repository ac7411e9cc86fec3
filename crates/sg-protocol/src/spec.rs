//! SSH connection parameters

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Port used when a request does not name one
pub const DEFAULT_SSH_PORT: u16 = 22;

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// Target host, credentials and command for one SSH attempt.
///
/// Built fresh for every request and never reused. The password is
/// redacted from the `Debug` representation so specs can be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    /// Hostname or IP address of the SSH server
    pub host: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// Command line to run on the remote host
    pub command: String,
}

impl ConnectionSpec {
    /// Create a spec targeting the default SSH port
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            password: password.into(),
            command: command.into(),
        }
    }

    /// Override the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` form used for dialing and log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that every field except the port is non-empty
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::MissingField("host"));
        }
        if self.username.trim().is_empty() {
            return Err(ProtocolError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(ProtocolError::MissingField("password"));
        }
        if self.command.trim().is_empty() {
            return Err(ProtocolError::MissingField("command"));
        }
        if self.port == 0 {
            return Err(ProtocolError::InvalidPort(self.port));
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSpec")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("command", &self.command)
            .finish()
    }
}
