//! Status repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist status updates keyed by `status_id`.
//! - Keep the owning user's `status_count` in step with status writes.
//!
//! # Invariants
//! - Every status write and its counter adjustment commit in one transaction.
//! - Counter adjustments are no-ops when the owner row is absent.
//! - Counters never drop below zero.

use super::{ensure_connection_ready, map_insert_error, RepoError, RepoResult};
use crate::model::status::Status;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

const STATUS_SELECT_SQL: &str = "SELECT
    status_id,
    user_id,
    status_text
FROM status_updates";

/// Repository interface for status records.
pub trait StatusRepository {
    fn insert(&self, status: &Status) -> RepoResult<()>;
    fn find_one(&self, status_id: &str) -> RepoResult<Option<Status>>;
    /// Overwrites owner and text of `status.status_id`.
    fn update_one(&self, status: &Status) -> RepoResult<()>;
    fn delete_one(&self, status_id: &str) -> RepoResult<()>;
    /// Lists statuses owned by `user_id`, ordered by `status_id`.
    fn list_by_owner(&self, user_id: &str) -> RepoResult<Vec<Status>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed status repository.
pub struct SqliteStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatusRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// The `users` table must be present as well, since counters live there.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "status_updates")?;
        ensure_connection_ready(conn, "users")?;
        Ok(Self { conn })
    }
}

impl StatusRepository for SqliteStatusRepository<'_> {
    fn insert(&self, status: &Status) -> RepoResult<()> {
        status.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO status_updates (status_id, user_id, status_text)
             VALUES (?1, ?2, ?3);",
            params![status.status_id, status.user_id, status.status_text],
        )
        .map_err(|err| map_insert_error(err, &status.status_id))?;
        adjust_status_count(&tx, &status.user_id, 1)?;
        tx.commit()?;

        Ok(())
    }

    fn find_one(&self, status_id: &str) -> RepoResult<Option<Status>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STATUS_SELECT_SQL} WHERE status_id = ?1;"))?;
        let status = stmt.query_row([status_id], parse_status_row).optional()?;
        Ok(status)
    }

    fn update_one(&self, status: &Status) -> RepoResult<()> {
        status.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let previous_owner = owner_of(&tx, &status.status_id)?
            .ok_or_else(|| RepoError::NotFound(status.status_id.clone()))?;

        tx.execute(
            "UPDATE status_updates
             SET
                user_id = ?1,
                status_text = ?2
             WHERE status_id = ?3;",
            params![status.user_id, status.status_text, status.status_id],
        )?;

        if previous_owner != status.user_id {
            adjust_status_count(&tx, &previous_owner, -1)?;
            adjust_status_count(&tx, &status.user_id, 1)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_one(&self, status_id: &str) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let owner =
            owner_of(&tx, status_id)?.ok_or_else(|| RepoError::NotFound(status_id.to_string()))?;

        tx.execute(
            "DELETE FROM status_updates WHERE status_id = ?1;",
            [status_id],
        )?;
        adjust_status_count(&tx, &owner, -1)?;
        tx.commit()?;

        Ok(())
    }

    fn list_by_owner(&self, user_id: &str) -> RepoResult<Vec<Status>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{STATUS_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY status_id ASC;"
        ))?;
        let rows = stmt.query_map([user_id], parse_status_row)?;

        let mut statuses = Vec::new();
        for row in rows {
            statuses.push(row?);
        }
        Ok(statuses)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM status_updates;",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }
}

fn owner_of(tx: &Transaction<'_>, status_id: &str) -> RepoResult<Option<String>> {
    let owner = tx
        .query_row(
            "SELECT user_id FROM status_updates WHERE status_id = ?1;",
            [status_id],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(owner)
}

fn adjust_status_count(tx: &Transaction<'_>, user_id: &str, delta: i64) -> RepoResult<()> {
    tx.execute(
        "UPDATE users
         SET status_count = MAX(status_count + ?1, 0)
         WHERE user_id = ?2;",
        params![delta, user_id],
    )?;
    Ok(())
}

fn parse_status_row(row: &Row<'_>) -> rusqlite::Result<Status> {
    Ok(Status {
        status_id: row.get("status_id")?,
        user_id: row.get("user_id")?,
        status_text: row.get("status_text")?,
    })
}
