//! Audit sink trait

use async_trait::async_trait;

use crate::error::AuditError;
use crate::types::AuditRecord;

/// Append-only store of execution records.
///
/// Implementations must tolerate concurrent writers.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError>;

    /// Up to `limit` records, most recent first
    async fn recent_records(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError>;
}
