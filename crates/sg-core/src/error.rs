//! Core error types for sshgate

use sg_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the sshgate crates
#[derive(Error, Debug)]
pub enum SgError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// SSH execution error
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Audit store error
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration document error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single SSH execution.
///
/// These never cross the dispatcher boundary as errors: the executor turns
/// them into the `stderr` of a failed `ExecutionResult`, so the messages
/// are client-facing and must never contain credentials.
#[derive(Error, Debug)]
pub enum ExecError {
    /// Credentials were rejected by the server
    #[error("SSH Authentication failed. Check username/password.")]
    AuthenticationFailed,

    /// Transport or handshake did not complete within the connect timeout
    #[error("Connection to {address} timed out after {timeout_secs}s")]
    ConnectTimeout { address: String, timeout_secs: u64 },

    /// Host unreachable, refused, reset, or the handshake failed
    #[error("Connection to {address} failed: {message}")]
    Connect { address: String, message: String },

    /// SSH protocol failure after the transport was established
    #[error("SSH Error: {0}")]
    Protocol(String),

    /// The remote command did not finish within the command timeout
    #[error("Command timed out after {timeout_secs}s")]
    CommandTimeout { timeout_secs: u64 },

    /// The executor worker went away before producing a result
    #[error("Execution worker failed: {0}")]
    Worker(String),
}

/// Audit store errors
#[derive(Error, Debug)]
pub enum AuditError {
    /// Store could not be opened or reached
    #[error("Audit store unavailable: {0}")]
    Unavailable(String),

    /// A read or write against the store failed
    #[error("Audit storage failure: {0}")]
    Storage(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The named file does not exist
    #[error("no configuration file at {0}")]
    NotFound(PathBuf),

    /// Unreadable file or out-of-range value
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Malformed TOML
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from the configuration document collaborator
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Name contains characters outside `[A-Za-z0-9_-]`
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    /// No document with this name
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Document exists but could not be read
    #[error("Error loading {name} config: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON
    #[error("Error loading {name} config: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_message_is_generic() {
        let msg = ExecError::AuthenticationFailed.to_string();
        assert_eq!(msg, "SSH Authentication failed. Check username/password.");
    }

    #[test]
    fn test_connect_failure_names_address() {
        let err = ExecError::Connect {
            address: "127.0.0.1:9999".to_string(),
            message: "Connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Connection to 127.0.0.1:9999 failed: Connection refused"
        );
    }

    #[test]
    fn test_errors_convert_into_sg_error() {
        let err: SgError = AuditError::Storage("disk full".to_string()).into();
        assert!(matches!(err, SgError::Audit(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
