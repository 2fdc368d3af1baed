// 🗄️ Instance Store - one row per named configuration (SQLite)
//
// Plain pass-through queries. Concurrent updates to one row race at the
// database: last writer wins.

use crate::instance::{Instance, InstanceSummary};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS instance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            data TEXT NOT NULL DEFAULT '{}',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_instance_type ON instance(type)",
        [],
    )?;

    Ok(())
}

/// Insert a new instance, returning its id
pub fn insert_instance(conn: &Connection, name: &str, kind: &str, data: &Value) -> Result<i64> {
    let data_json = serde_json::to_string(data)?;

    conn.execute(
        "INSERT INTO instance (name, type, data) VALUES (?1, ?2, ?3)",
        params![name, kind, data_json],
    )
    .with_context(|| format!("Failed to insert instance '{}'", name))?;

    Ok(conn.last_insert_rowid())
}

/// All instances of one type, by id
pub fn list_instances(conn: &Connection, kind: &str) -> Result<Vec<InstanceSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, name
         FROM instance
         WHERE type = ?1
         ORDER BY id",
    )?;

    let instances = stmt
        .query_map([kind], |row| {
            Ok(InstanceSummary {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(instances)
}

/// Full row, or None when the id has no row
pub fn get_instance(conn: &Connection, id: i64) -> Result<Option<Instance>> {
    let row = conn
        .query_row(
            "SELECT id, name, type, data FROM instance WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((id, name, kind, data_json)) = row else {
        return Ok(None);
    };

    let data = serde_json::from_str(&data_json)
        .with_context(|| format!("Instance {} holds malformed JSON data", id))?;

    Ok(Some(Instance {
        id,
        name,
        kind,
        data,
    }))
}

/// Overwrite the data blob. Returns false when no row has that id.
pub fn update_instance_data(conn: &Connection, id: i64, data: &Value) -> Result<bool> {
    let data_json = serde_json::to_string(data)?;

    let changed = conn.execute(
        "UPDATE instance SET data = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
        params![data_json, id],
    )?;

    Ok(changed > 0)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM instance", [], |row| row.get(0))?;

    Ok(count)
}
