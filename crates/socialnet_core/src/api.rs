//! Public entry points over the user and status collections.
//!
//! # Responsibility
//! - Build collections over a shared store connection.
//! - Expose load/CRUD/search calls as flags or optional records.
//! - Time every call through `instrument::timed`.
//!
//! # Invariants
//! - No call here returns an error except collection construction, which
//!   fails only for connections that were never migrated.

use crate::instrument::timed;
use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::status_repo::{SqliteStatusRepository, StatusRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoResult;
use crate::service::loader::{self, LoadOptions, LoadReport};
use crate::service::status_collection::StatusCollection;
use crate::service::user_collection::UserCollection;
use log::info;
use rusqlite::Connection;
use std::path::Path;

pub type SqliteUserCollection<'conn> = UserCollection<SqliteUserRepository<'conn>>;
pub type SqliteStatusCollection<'conn> = StatusCollection<SqliteStatusRepository<'conn>>;

/// Creates a user collection sharing `conn`.
pub fn init_user_collection(conn: &Connection) -> RepoResult<SqliteUserCollection<'_>> {
    let collection = UserCollection::new(SqliteUserRepository::try_new(conn)?);
    info!("event=collection_init module=api status=ok collection=users");
    Ok(collection)
}

/// Creates a status collection sharing `conn`, with unchecked owners.
pub fn init_status_collection(conn: &Connection) -> RepoResult<SqliteStatusCollection<'_>> {
    let collection = StatusCollection::new(SqliteStatusRepository::try_new(conn)?);
    info!("event=collection_init module=api status=ok collection=statuses");
    Ok(collection)
}

/// Loads a user CSV; `true` only if every row was inserted.
///
/// Existing ids are skipped and the load continues, but the result is
/// still `false`.
pub fn load_users<R: UserRepository>(
    filename: impl AsRef<Path>,
    user_collection: &UserCollection<R>,
) -> bool {
    load_users_with(filename, user_collection, &LoadOptions::default()).is_success()
}

/// Loads a user CSV with explicit options and returns the full report.
pub fn load_users_with<R: UserRepository>(
    filename: impl AsRef<Path>,
    user_collection: &UserCollection<R>,
    options: &LoadOptions,
) -> LoadReport {
    timed("load_users", || {
        loader::load_users(filename, user_collection, options)
    })
}

/// Loads a status CSV; `true` only if every row was inserted.
pub fn load_status_updates<S: StatusRepository, U: UserRepository>(
    filename: impl AsRef<Path>,
    status_collection: &StatusCollection<S>,
    user_collection: &UserCollection<U>,
) -> bool {
    load_status_updates_with(
        filename,
        status_collection,
        user_collection,
        &LoadOptions::default(),
    )
    .is_success()
}

/// Loads a status CSV with explicit options and returns the full report.
pub fn load_status_updates_with<S: StatusRepository, U: UserRepository>(
    filename: impl AsRef<Path>,
    status_collection: &StatusCollection<S>,
    user_collection: &UserCollection<U>,
    options: &LoadOptions,
) -> LoadReport {
    timed("load_status_updates", || {
        loader::load_status_updates(filename, status_collection, user_collection, options)
    })
}

pub fn add_user<R: UserRepository>(
    user_id: &str,
    user_name: &str,
    user_last_name: &str,
    email: &str,
    user_collection: &UserCollection<R>,
) -> bool {
    timed("add_user", || {
        user_collection.add_user(user_id, user_name, user_last_name, email)
    })
}

pub fn update_user<R: UserRepository>(
    user_id: &str,
    email: &str,
    user_name: &str,
    user_last_name: &str,
    user_collection: &UserCollection<R>,
) -> bool {
    timed("update_user", || {
        user_collection.modify_user(user_id, email, user_name, user_last_name)
    })
}

pub fn delete_user<R: UserRepository>(user_id: &str, user_collection: &UserCollection<R>) -> bool {
    timed("delete_user", || user_collection.delete_user(user_id))
}

pub fn search_user<R: UserRepository>(
    user_id: &str,
    user_collection: &UserCollection<R>,
) -> Option<User> {
    timed("search_user", || user_collection.search_user(user_id))
}

pub fn add_status<S: StatusRepository, U: UserRepository>(
    status_id: &str,
    user_id: &str,
    status_text: &str,
    status_collection: &StatusCollection<S>,
    user_collection: &UserCollection<U>,
) -> bool {
    timed("add_status", || {
        status_collection.add_status(status_id, user_id, status_text, user_collection)
    })
}

pub fn update_status<S: StatusRepository>(
    status_id: &str,
    user_id: &str,
    status_text: &str,
    status_collection: &StatusCollection<S>,
) -> bool {
    timed("update_status", || {
        status_collection.modify_status(status_id, user_id, status_text)
    })
}

pub fn delete_status<S: StatusRepository>(
    status_id: &str,
    status_collection: &StatusCollection<S>,
) -> bool {
    timed("delete_status", || status_collection.delete_status(status_id))
}

pub fn search_status<S: StatusRepository>(
    status_id: &str,
    status_collection: &StatusCollection<S>,
) -> Option<Status> {
    timed("search_status", || status_collection.search_status(status_id))
}

/// Lists every status owned by `user_id`.
pub fn search_all_status_updates<S: StatusRepository>(
    user_id: &str,
    status_collection: &StatusCollection<S>,
) -> Vec<Status> {
    timed("search_all_status_updates", || {
        status_collection.search_all_status_updates(user_id)
    })
}
