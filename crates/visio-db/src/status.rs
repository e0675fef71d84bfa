//! Status-check records: client health pings kept for diagnostics.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use thiserror::Error;
use uuid::Uuid;
use visio_types::StatusCheck;

/// Upper bound on rows returned by [`list_status_checks`].
pub const MAX_STATUS_CHECKS: usize = 1000;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("client_name must not be empty")]
    EmptyClientName,

    #[error("status check database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored timestamp is not RFC 3339: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Records a status check with a fresh UUID and the current time.
pub fn insert_status_check(conn: &Connection, client_name: &str) -> Result<StatusCheck, StatusError> {
    let client_name = client_name.trim();
    if client_name.is_empty() {
        return Err(StatusError::EmptyClientName);
    }

    let check = StatusCheck {
        id: Uuid::new_v4().to_string(),
        client_name: client_name.to_string(),
        timestamp: Utc::now(),
    };
    conn.execute(
        "INSERT INTO status_checks (id, client_name, created_at) VALUES (?1, ?2, ?3)",
        params![check.id, check.client_name, check.timestamp.to_rfc3339()],
    )?;

    Ok(check)
}

/// Returns up to `limit` status checks (capped at [`MAX_STATUS_CHECKS`]), oldest first.
pub fn list_status_checks(conn: &Connection, limit: usize) -> Result<Vec<StatusCheck>, StatusError> {
    let limit = limit.min(MAX_STATUS_CHECKS) as i64;
    let mut stmt = conn.prepare(
        "SELECT id, client_name, created_at FROM status_checks ORDER BY seq ASC LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut checks = Vec::new();
    for row in rows {
        let (id, client_name, created_at) = row?;
        checks.push(StatusCheck {
            id,
            client_name,
            timestamp: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
        });
    }
    Ok(checks)
}
