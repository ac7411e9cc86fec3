//! Command executor trait

use async_trait::async_trait;

use sg_protocol::ConnectionSpec;

use crate::types::ExecutionResult;

/// Runs one command against a remote target.
///
/// Implementations never fail: transport, authentication and timeout
/// failures are reported inside the returned [`ExecutionResult`].
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `spec.command` on `spec.host`
    async fn execute(&self, spec: &ConnectionSpec) -> ExecutionResult;
}
