//! SQLite-backed audit sink

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use sg_core::error::AuditError;
use sg_core::traits::AuditSink;
use sg_core::AuditRecord;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ssh_logs (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id      TEXT    NOT NULL,
    host            TEXT    NOT NULL,
    command         TEXT    NOT NULL,
    success         INTEGER NOT NULL,
    stdout          TEXT    NOT NULL,
    stderr          TEXT    NOT NULL,
    elapsed_seconds REAL    NOT NULL,
    timestamp       INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS ssh_logs_timestamp ON ssh_logs (timestamp);
";

/// Persists records to the `ssh_logs` table.
///
/// rusqlite is blocking, so every query runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteAuditSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAuditSink {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self, AuditError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AuditError::Unavailable(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| AuditError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::with_connection(conn)
    }

    /// A private database that lives as long as the sink
    pub fn in_memory() -> Result<Self, AuditError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AuditError::Unavailable(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, AuditError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AuditError::Unavailable(format!("failed to create schema: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, AuditError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| AuditError::Storage(format!("connection lock poisoned: {}", e)))?;
            f(&conn).map_err(|e| AuditError::Storage(e.to_string()))
        })
        .await
        .map_err(|e| AuditError::Storage(format!("audit task failed: {}", e)))?
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO ssh_logs
                    (request_id, host, command, success, stdout, stderr, elapsed_seconds, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.request_id,
                    record.host,
                    record.command,
                    record.success,
                    record.stdout,
                    record.stderr,
                    record.elapsed_seconds,
                    record.timestamp as i64,
                ],
            )
            .map(|_| ())
        })
        .await
    }

    async fn recent_records(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT request_id, host, command, success, stdout, stderr, elapsed_seconds, timestamp
                 FROM ssh_logs
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(AuditRecord {
                    request_id: row.get(0)?,
                    host: row.get(1)?,
                    command: row.get(2)?,
                    success: row.get(3)?,
                    stdout: row.get(4)?,
                    stderr: row.get(5)?,
                    elapsed_seconds: row.get(6)?,
                    timestamp: row.get::<_, i64>(7)? as u64,
                })
            })?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>();
            records
        })
        .await
    }
}
