//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `user_id` uniqueness is enforced by the store's primary key.
//! - `update_one` never touches `user_id` or `status_count`.
//! - `insert` ignores the caller's `status_count` and counts stored statuses.

use super::{ensure_connection_ready, map_insert_error, RepoError, RepoResult};
use crate::model::user::User;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    user_id,
    user_name,
    user_last_name,
    email,
    status_count
FROM users";

/// Repository interface for user records.
pub trait UserRepository {
    fn insert(&self, user: &User) -> RepoResult<()>;
    fn find_one(&self, user_id: &str) -> RepoResult<Option<User>>;
    /// Overwrites `user_name`, `user_last_name` and `email` of `user.user_id`.
    fn update_one(&self, user: &User) -> RepoResult<()>;
    fn delete_one(&self, user_id: &str) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "users")?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        // Starts from the statuses already stored under this id.
        self.conn
            .execute(
                "INSERT INTO users (user_id, user_name, user_last_name, email, status_count)
                 VALUES (
                    ?1, ?2, ?3, ?4,
                    (SELECT COUNT(*) FROM status_updates WHERE user_id = ?1)
                 );",
                params![user.user_id, user.user_name, user.user_last_name, user.email],
            )
            .map_err(|err| map_insert_error(err, &user.user_id))?;

        Ok(())
    }

    fn find_one(&self, user_id: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{USER_SELECT_SQL} WHERE user_id = ?1;"))?;
        let user = stmt.query_row([user_id], parse_user_row).optional()?;
        Ok(user)
    }

    fn update_one(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                user_name = ?1,
                user_last_name = ?2,
                email = ?3
             WHERE user_id = ?4;",
            params![user.user_name, user.user_last_name, user.email, user.user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(user.user_id.clone()));
        }
        Ok(())
    }

    fn delete_one(&self, user_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE user_id = ?1;", [user_id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(user_id.to_string()));
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get::<_, u64>(0))?;
        Ok(count)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get("user_id")?,
        user_name: row.get("user_name")?,
        user_last_name: row.get("user_last_name")?,
        email: row.get("email")?,
        status_count: row.get("status_count")?,
    })
}
