// src/db/settings.rs
use crate::domain::settings::{
    RawSettings, Settings, OPT_ORDER_STATUSES, OPT_PRODUCT_CATEGORIES, OPT_SCRIPT_URL,
    OPT_SELECTED_FIELDS,
};
use crate::errors::ServerError;
use rusqlite::{params, Connection};

pub fn load_raw_settings(conn: &Connection) -> Result<RawSettings, ServerError> {
    let mut stmt = conn
        .prepare("select name, value from options")
        .map_err(|e| ServerError::DbError(format!("load settings failed: {e}")))?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(|e| ServerError::DbError(format!("load settings failed: {e}")))?;

    let mut raw = RawSettings::default();
    for r in rows {
        let (name, value) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        match name.as_str() {
            OPT_ORDER_STATUSES => raw.order_statuses = Some(value),
            OPT_SCRIPT_URL => raw.script_url = Some(value),
            OPT_PRODUCT_CATEGORIES => raw.product_categories = Some(value),
            OPT_SELECTED_FIELDS => raw.selected_fields = Some(value),
            _ => {}
        }
    }
    Ok(raw)
}

/// Always reads storage; edits made elsewhere are visible immediately.
pub fn load_settings(conn: &Connection) -> Result<Settings, ServerError> {
    load_raw_settings(conn).map(|raw| Settings::from_raw(&raw))
}

pub fn save_settings(conn: &mut Connection, settings: &Settings) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    for (name, value) in settings.to_stored() {
        tx.execute(
            r#"
            insert into options (name, value) values (?, ?)
            on conflict(name) do update set value = excluded.value
            "#,
            params![name, value],
        )
        .map_err(|e| ServerError::DbError(format!("save setting {name} failed: {e}")))?;
    }

    tx.commit().map_err(|e| ServerError::DbError(e.to_string()))
}
