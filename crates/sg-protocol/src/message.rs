//! Message types for the sshgate session channel
//!
//! Every message is a JSON object with a `type` field.
//!
//! # Message Flow
//!
//! 1. Client sends `execute_ssh` with a [`ConnectionSpec`] and a request id
//! 2. Gateway replies `status` (`connecting`) immediately
//! 3. Gateway sends `output` or `error` once the command has finished
//! 4. Gateway sends `complete`, the terminal marker for that request
//!
//! Messages with an unrecognised `type` decode to [`ClientMessage::Unknown`]
//! and are ignored by the gateway.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::spec::ConnectionSpec;

/// Request id used when the client does not supply one
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

fn unknown_request_id() -> String {
    UNKNOWN_REQUEST_ID.to_string()
}

/// Messages sent from a client to the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run a command over SSH
    ExecuteSsh {
        /// Target and command
        ssh: ConnectionSpec,
        /// Caller-chosen correlation id (typically the button id)
        #[serde(alias = "button_id", default = "unknown_request_id")]
        request_id: String,
    },

    /// Any message type the gateway does not understand
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text frame.
    ///
    /// Only an explicit `"type": "execute_ssh"` is decoded strictly. Any
    /// other JSON value, including one without a string `type`, is
    /// [`ClientMessage::Unknown`]. Text that is not JSON is an error.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some("execute_ssh") => Ok(serde_json::from_value(value)?),
            _ => Ok(ClientMessage::Unknown),
        }
    }
}

/// Progress reported in a `status` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// The gateway accepted the request and is opening the SSH transport
    Connecting,
}

/// Events pushed from the gateway to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Work on a request has started
    Status {
        status: ExecutionStatus,
        message: String,
        request_id: String,
    },

    /// Command succeeded; `data` is the captured stdout
    Output {
        data: String,
        success: bool,
        request_id: String,
    },

    /// Command failed, or the client sent a malformed message
    Error {
        data: String,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },

    /// Terminal marker for a request
    Complete { success: bool, request_id: String },
}

impl GatewayEvent {
    /// `status: connecting` for a request against `host`
    pub fn connecting(request_id: impl Into<String>, host: &str) -> Self {
        Self::Status {
            status: ExecutionStatus::Connecting,
            message: format!("Connecting to {}...", host),
            request_id: request_id.into(),
        }
    }

    /// Successful command output
    pub fn output(request_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Output {
            data: data.into(),
            success: true,
            request_id: request_id.into(),
        }
    }

    /// Failed command output
    pub fn error(request_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Error {
            data: data.into(),
            success: false,
            request_id: Some(request_id.into()),
        }
    }

    /// Rejection of a message that could not be decoded
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Error {
            data: reason.into(),
            success: false,
            request_id: None,
        }
    }

    /// Terminal event for a request
    pub fn complete(request_id: impl Into<String>, success: bool) -> Self {
        Self::Complete {
            success,
            request_id: request_id.into(),
        }
    }

    /// The wire `type` of this event
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Output { .. } => "output",
            Self::Error { .. } => "error",
            Self::Complete { .. } => "complete",
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
