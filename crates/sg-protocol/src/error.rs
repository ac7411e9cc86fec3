//! Protocol error types

use thiserror::Error;

/// Errors that can occur while decoding or validating protocol messages
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A required field was empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Port zero is never a valid SSH target
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    /// Message could not be decoded
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Binary frames are not part of the protocol
    #[error("Unsupported frame: expected a JSON text message")]
    UnsupportedFrame,
}
