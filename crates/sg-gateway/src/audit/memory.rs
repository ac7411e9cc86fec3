//! In-memory audit sink

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use sg_core::error::AuditError;
use sg_core::traits::AuditSink;
use sg_core::AuditRecord;

/// Keeps the most recent records in a bounded ring
pub struct MemoryAuditSink {
    records: Mutex<VecDeque<AuditRecord>>,
    capacity: usize,
}

impl MemoryAuditSink {
    /// Create a sink retaining at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of retained records
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Check if empty
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        let mut records = self.records.lock().await;
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }

    async fn recent_records(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
