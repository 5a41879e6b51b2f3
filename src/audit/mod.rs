//! Per-owner history of credential operations, kept in SQLite at
//! `<store_dir>/audit.db`.
//!
//! Rows carry the operation, owner, credential id and a short detail
//! string; passwords and envelopes are never written here.  Logging is
//! best effort: a missing or unwritable database never fails the
//! operation being recorded.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{CredVaultError, Result};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub owner: String,
    pub credential_id: Option<u64>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<store_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(store_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(store_dir);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(error = %e, "audit log unavailable");
                return None;
            }
        };

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp     TEXT NOT NULL,
                operation     TEXT NOT NULL,
                owner         TEXT NOT NULL,
                credential_id INTEGER,
                details       TEXT
            );
            CREATE INDEX IF NOT EXISTS audit_log_owner ON audit_log (owner, id);",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Errors are only traced.
    pub fn log(
        &self,
        operation: &str,
        owner: &str,
        credential_id: Option<u64>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let credential_id = credential_id.and_then(|id| i64::try_from(id).ok());
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, owner, credential_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, owner, credential_id, details],
        ) {
            tracing::debug!(error = %e, operation, "failed to write audit entry");
        }
    }

    /// Query recent audit entries for `owner`.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(
        &self,
        owner: &str,
        limit: usize,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // RFC 3339 strings from `to_rfc3339` sort chronologically.
        let since_str = since.map_or_else(String::new, |ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, owner, credential_id, details
                 FROM audit_log
                 WHERE owner = ?1 AND timestamp >= ?2
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| CredVaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![owner, since_str, limit_i64], entry_from_row)
            .map_err(|e| CredVaultError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CredVaultError::AuditError(format!("row parse: {e}")))
    }

    /// Return the path to the audit database.
    pub fn db_path(store_dir: &Path) -> PathBuf {
        store_dir.join("audit.db")
    }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditEntry> {
    let raw_ts: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_ts)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default();
    let credential_id: Option<i64> = row.get(4)?;

    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp,
        operation: row.get(2)?,
        owner: row.get(3)?,
        credential_id: credential_id.and_then(|id| u64::try_from(id).ok()),
        details: row.get(5)?,
    })
}

/// Convenience helper: open the audit database, log one event, and ignore
/// any failure.  Safe to call from any command.
pub fn log_audit(
    store_dir: &Path,
    owner: &str,
    operation: &str,
    credential_id: Option<u64>,
    details: Option<&str>,
) {
    if let Some(audit) = AuditLog::open(store_dir) {
        audit.log(operation, owner, credential_id, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_database_file() {
        let dir = TempDir::new().unwrap();
        assert!(AuditLog::open(dir.path()).is_some());
        assert!(dir.path().join("audit.db").exists());
    }

    #[test]
    fn newest_entries_come_first() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", "alice", Some(1), Some("github.com"));
        audit.log("get", "alice", Some(1), None);
        audit.log("delete", "alice", Some(1), None);

        let entries = audit.query("alice", 10, None).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].operation, "delete");
        assert_eq!(entries[1].operation, "get");
        assert_eq!(entries[2].operation, "add");
        assert_eq!(entries[2].credential_id, Some(1));
        assert_eq!(entries[2].details.as_deref(), Some("github.com"));
    }

    #[test]
    fn query_is_scoped_to_owner() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", "alice", Some(1), None);
        audit.log("add", "bob", Some(2), None);

        let entries = audit.query("bob", 10, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].owner, "bob");
    }

    #[test]
    fn limit_caps_results() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..10 {
            audit.log("add", "alice", Some(i), None);
        }

        assert_eq!(audit.query("alice", 3, None).unwrap().len(), 3);
    }

    #[test]
    fn since_excludes_older_entries() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("init", "alice", None, None);

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(audit.query("alice", 10, Some(past)).unwrap().len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(audit.query("alice", 10, Some(future)).unwrap().is_empty());
    }

    #[test]
    fn unopenable_path_disables_logging() {
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn database_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(dir.path().join("audit.db"))
            .unwrap()
            .permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
