use crate::errors::ServerError;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct DeliveryRecord {
    pub id: i64,
    pub order_id: i64,
    pub status: String,
    pub attempted_at: i64,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Rows kept in the journal; older attempts are pruned on insert.
pub const JOURNAL_KEEP: usize = 1000;

pub fn record_delivery(
    conn: &Connection,
    order_id: u64,
    status: &str,
    now: i64,
    success: bool,
    error: Option<&str>,
) -> Result<i64, ServerError> {
    let order_id = i64::try_from(order_id).map_err(|_| {
        log::warn!("order id {order_id} does not fit the journal, not recorded");
        ServerError::BadRequest(format!("order id {order_id} out of range"))
    })?;

    conn.execute(
        "INSERT INTO deliveries (order_id, status, attempted_at, success, error_message) VALUES (?, ?, ?, ?, ?)",
        params![order_id, status, now, success, error],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    let id = conn.last_insert_rowid();

    prune_deliveries(conn, JOURNAL_KEEP)?;
    Ok(id)
}

/// Delete everything but the `keep` newest attempts.
pub fn prune_deliveries(conn: &Connection, keep: usize) -> Result<usize, ServerError> {
    conn.execute(
        r#"
        DELETE FROM deliveries WHERE id NOT IN (
            SELECT id FROM deliveries ORDER BY attempted_at DESC, id DESC LIMIT ?
        )
        "#,
        params![keep as i64],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn get_recent_deliveries(conn: &Connection, limit: usize) -> Result<Vec<DeliveryRecord>, ServerError> {
    let mut stmt = conn
        .prepare("SELECT id, order_id, status, attempted_at, success, error_message FROM deliveries ORDER BY attempted_at DESC, id DESC LIMIT ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(DeliveryRecord {
                id: row.get(0)?,
                order_id: row.get(1)?,
                status: row.get(2)?,
                attempted_at: row.get(3)?,
                success: row.get(4)?,
                error_message: row.get(5)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(runs)
}
