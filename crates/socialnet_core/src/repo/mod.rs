//! Repository layer over the record store.
//!
//! # Responsibility
//! - Define per-collection data access contracts (`insert`, `find_one`,
//!   `update_one`, `delete_one`).
//! - Translate SQLite failures into semantic errors (`DuplicateKey`,
//!   `NotFound`) that collections can act on.
//!
//! # Invariants
//! - Write paths call `validate()` on the record before any SQL mutation.
//! - Repositories borrow the shared connection; they never own it.

pub mod status_repo;
pub mod user_repo;

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by the user and status stores.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Insert targeted a primary key that is already stored.
    DuplicateKey(String),
    /// Update/delete targeted a primary key that is not stored.
    NotFound(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Stable short code used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::DuplicateKey(_) => "duplicate_key",
            Self::NotFound(_) => "not_found",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey(key) => write!(f, "record already exists: {key}"),
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps an insert failure, singling out primary-key collisions.
pub(crate) fn map_insert_error(err: rusqlite::Error, key: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
                ) =>
        {
            RepoError::DuplicateKey(key.to_string())
        }
        _ => err.into(),
    }
}

/// Rejects connections that were not opened through `open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}
