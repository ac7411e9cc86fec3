//! HTTP API bodies shared by the gateway and the CLI
//!
//! All bodies are JSON. Error responses use `{"detail": "..."}`.

use serde::{Deserialize, Serialize};

use sg_protocol::ConnectionSpec;

use crate::types::{AuditRecord, ExecutionResult};

/// `GET /api/` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}

/// `POST /api/ssh/execute` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub ssh: ConnectionSpec,
    pub button_id: String,
}

/// `POST /api/ssh/execute` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    /// stdout on success, stderr on failure
    pub output: String,
    /// stderr on failure, `null` on success
    pub error: Option<String>,
    /// Seconds spent in the SSH call
    pub execution_time: f64,
}

impl From<&ExecutionResult> for ExecuteResponse {
    fn from(result: &ExecutionResult) -> Self {
        Self {
            success: result.success,
            output: result.display_text().to_string(),
            error: (!result.success).then(|| result.stderr.clone()),
            execution_time: result.elapsed_seconds,
        }
    }
}

/// `GET /api/ssh/logs` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// `GET /api/ssh/logs` response, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<AuditRecord>,
}

/// `POST /api/config/validate` success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub message: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
