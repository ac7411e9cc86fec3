//! Audit sinks
//!
//! Two implementations of [`sg_core::traits::AuditSink`]: a bounded
//! in-memory ring and a SQLite-backed store. The daemon picks one with
//! [`open_sink`].

mod memory;
mod sqlite;

pub use memory::MemoryAuditSink;
pub use sqlite::SqliteAuditSink;

use std::sync::Arc;

use sg_core::config::AuditConfig;
use sg_core::error::AuditError;
use sg_core::traits::AuditSink;

/// Open the sink described by `config`: SQLite when a path is set, memory otherwise
pub fn open_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, AuditError> {
    match &config.path {
        Some(path) => {
            tracing::info!("Audit records stored in {}", path.display());
            Ok(Arc::new(SqliteAuditSink::open(path)?))
        }
        None => {
            tracing::info!(
                "No audit database configured, keeping the last {} records in memory",
                config.memory_capacity
            );
            Ok(Arc::new(MemoryAuditSink::new(config.memory_capacity)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::{AuditRecord, ExecutionResult, RequestId};
    use sg_protocol::ConnectionSpec;

    fn record() -> AuditRecord {
        let spec = ConnectionSpec::new("pi.local", "pi", "pw", "uptime");
        let result = ExecutionResult::completed("up".into(), String::new(), Some(0), 0.3);
        AuditRecord::new(&RequestId::new("b1"), &spec, &result)
    }

    #[tokio::test]
    async fn test_open_memory_sink_by_default() {
        let sink = open_sink(&AuditConfig::default()).unwrap();
        sink.append(record()).await.unwrap();
        assert_eq!(sink.recent_records(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_sqlite_sink_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig {
            path: Some(dir.path().join("audit.db")),
            ..Default::default()
        };

        let sink = open_sink(&config).unwrap();
        sink.append(record()).await.unwrap();
        assert!(dir.path().join("audit.db").exists());
        assert_eq!(sink.recent_records(10).await.unwrap()[0].request_id, "b1");
    }
}
