//! Schema upgrades for the record store.
//!
//! Each step is a SQL script tagged with the `user_version` it produces.
//! Steps are listed in ascending order and never edited once released.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// `(resulting user_version, script)`.
const STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_status_count.sql")),
];

/// Schema version a freshly opened store ends up at.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Schema version currently recorded in the store.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings `conn` up to `latest_version()`.
///
/// All outstanding steps share one transaction: either every step lands
/// or the store keeps its old version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let mut outstanding = STEPS.iter().filter(|(version, _)| *version > from).peekable();
    if outstanding.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in outstanding {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    Ok(())
}
