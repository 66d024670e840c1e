//! Core collections for the social network store.
//! Users and their status updates, persisted in SQLite, with CSV bulk import.

pub mod api;
pub mod db;
pub mod instrument;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{
    add_status, add_user, delete_status, delete_user, init_status_collection,
    init_user_collection, load_status_updates, load_status_updates_with, load_users,
    load_users_with, search_all_status_updates, search_status, search_user, update_status,
    update_user, SqliteStatusCollection, SqliteUserCollection,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::status::Status;
pub use model::user::User;
pub use model::ValidationError;
pub use repo::status_repo::{SqliteStatusRepository, StatusRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::loader::{LoadError, LoadOptions, LoadReport, MalformedRowPolicy};
pub use service::status_collection::{OwnerPolicy, StatusCollection};
pub use service::user_collection::UserCollection;
pub use service::CollectionError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
