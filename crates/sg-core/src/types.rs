//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

use sg_protocol::ConnectionSpec;

use crate::time::current_time_millis;

/// Caller-chosen identifier of a client session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new session ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Caller-supplied identifier correlating async results with a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A command issued by a session, consumed once by the dispatcher
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Target and command
    pub spec: ConnectionSpec,
    /// Correlation id echoed on every event
    pub request_id: RequestId,
    /// Session that receives the events
    pub session_id: SessionId,
}

impl ExecutionRequest {
    /// Bind a spec to a session
    pub fn new(
        spec: ConnectionSpec,
        request_id: impl Into<RequestId>,
        session_id: impl Into<SessionId>,
    ) -> Self {
        Self {
            spec,
            request_id: request_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Outcome of one SSH execution. Produced exactly once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True only when the remote command exited with status 0
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error, or the failure description
    pub stderr: String,
    /// Remote exit status, absent when the command never ran or was killed
    pub exit_status: Option<i32>,
    /// Wall-clock duration of the execution
    pub elapsed_seconds: f64,
}

impl ExecutionResult {
    /// Result of a command that ran to completion
    pub fn completed(
        stdout: String,
        stderr: String,
        exit_status: Option<i32>,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            success: exit_status == Some(0),
            stdout,
            stderr,
            exit_status,
            elapsed_seconds,
        }
    }

    /// Result of an execution that failed before or while running
    pub fn failed(message: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_status: None,
            elapsed_seconds,
        }
    }

    /// Text shown to the client: stdout on success, stderr otherwise
    pub fn display_text(&self) -> &str {
        if self.success {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Per-request lifecycle inside the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    /// `connecting` has been emitted
    Accepted,
    /// Handed to a worker
    Dispatched,
    /// Result delivered (or dropped) and `complete` emitted
    Completed,
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPhase::Accepted => write!(f, "accepted"),
            ExecutionPhase::Dispatched => write!(f, "dispatched"),
            ExecutionPhase::Completed => write!(f, "completed"),
        }
    }
}

/// Durable record of one execution. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub request_id: String,
    pub host: String,
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub elapsed_seconds: f64,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl AuditRecord {
    /// Build the record for a finished execution, stamped with the current time
    pub fn new(request_id: &RequestId, spec: &ConnectionSpec, result: &ExecutionResult) -> Self {
        Self {
            request_id: request_id.to_string(),
            host: spec.host.clone(),
            command: spec.command.clone(),
            success: result.success,
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            elapsed_seconds: result.elapsed_seconds,
            timestamp: current_time_millis(),
        }
    }
}
