//! User collection service.
//!
//! # Invariants
//! - Adding an existing `user_id` never mutates the stored record.
//! - Deleting a user leaves its statuses in place (dangling owner refs).

use super::{absorb, absorb_lookup, CollectionError};
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

const MODULE: &str = "users";

/// CRUD facade over user records.
pub struct UserCollection<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserCollection<R> {
    /// Creates a collection over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new user. Returns `false` if `user_id` already exists or the
    /// fields are invalid.
    pub fn add_user(
        &self,
        user_id: &str,
        user_name: &str,
        user_last_name: &str,
        email: &str,
    ) -> bool {
        let user = User::new(user_id, user_name, user_last_name, email);
        absorb("user_add", MODULE, user_id, self.insert(&user))
    }

    /// Overwrites the mutable fields of an existing user.
    pub fn modify_user(
        &self,
        user_id: &str,
        email: &str,
        user_name: &str,
        user_last_name: &str,
    ) -> bool {
        let user = User::new(user_id, user_name, user_last_name, email);
        let result = self.repo.update_one(&user).map_err(CollectionError::from);
        absorb("user_modify", MODULE, user_id, result)
    }

    pub fn delete_user(&self, user_id: &str) -> bool {
        let result = self.repo.delete_one(user_id).map_err(CollectionError::from);
        absorb("user_delete", MODULE, user_id, result)
    }

    /// Returns the stored user, or `None` when `user_id` is unknown.
    pub fn search_user(&self, user_id: &str) -> Option<User> {
        absorb_lookup("user_search", MODULE, user_id, self.repo.find_one(user_id))
    }

    /// Number of stored users.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    /// Inserts `user` and reports the typed failure instead of a flag.
    pub(crate) fn insert(&self, user: &User) -> Result<(), CollectionError> {
        self.repo.insert(user).map_err(CollectionError::from)
    }
}
