//! Status collection service.
//!
//! # Responsibility
//! - CRUD over status updates with `status_id` uniqueness.
//! - Consult the user collection on create according to `OwnerPolicy`.
//!
//! # Invariants
//! - A rejected add leaves both the status store and the owner's
//!   `status_count` untouched.

use super::user_collection::UserCollection;
use super::{absorb, absorb_lookup, CollectionError};
use crate::model::status::Status;
use crate::repo::status_repo::StatusRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use log::error;

const MODULE: &str = "statuses";

/// How `add_status` treats the referenced owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerPolicy {
    /// Attach to `user_id` as given; the owner may not exist.
    #[default]
    Unchecked,
    /// Fail the add when `user_id` is absent from the user collection.
    RequireExisting,
}

/// CRUD facade over status records.
pub struct StatusCollection<R: StatusRepository> {
    repo: R,
    owner_policy: OwnerPolicy,
}

impl<R: StatusRepository> StatusCollection<R> {
    /// Creates a collection with the default `OwnerPolicy::Unchecked`.
    pub fn new(repo: R) -> Self {
        Self::with_owner_policy(repo, OwnerPolicy::default())
    }

    pub fn with_owner_policy(repo: R, owner_policy: OwnerPolicy) -> Self {
        Self { repo, owner_policy }
    }

    pub fn owner_policy(&self) -> OwnerPolicy {
        self.owner_policy
    }

    /// Adds a status for `user_id` and bumps the owner's status counter.
    ///
    /// Returns `false` on duplicate `status_id`, invalid fields, or (under
    /// `OwnerPolicy::RequireExisting`) an unknown owner.
    pub fn add_status<U: UserRepository>(
        &self,
        status_id: &str,
        user_id: &str,
        status_text: &str,
        user_collection: &UserCollection<U>,
    ) -> bool {
        let status = Status::new(status_id, user_id, status_text);
        absorb(
            "status_add",
            MODULE,
            status_id,
            self.insert(&status, user_collection),
        )
    }

    /// Overwrites owner and text of an existing status.
    pub fn modify_status(&self, status_id: &str, user_id: &str, status_text: &str) -> bool {
        let status = Status::new(status_id, user_id, status_text);
        let result = self
            .repo
            .update_one(&status)
            .map_err(CollectionError::from);
        absorb("status_modify", MODULE, status_id, result)
    }

    pub fn delete_status(&self, status_id: &str) -> bool {
        let result = self
            .repo
            .delete_one(status_id)
            .map_err(CollectionError::from);
        absorb("status_delete", MODULE, status_id, result)
    }

    /// Returns the stored status, or `None` when `status_id` is unknown.
    pub fn search_status(&self, status_id: &str) -> Option<Status> {
        absorb_lookup(
            "status_search",
            MODULE,
            status_id,
            self.repo.find_one(status_id),
        )
    }

    /// Returns every status owned by `user_id`, ordered by `status_id`.
    ///
    /// Store faults yield an empty list and are logged.
    pub fn search_all_status_updates(&self, user_id: &str) -> Vec<Status> {
        match self.repo.list_by_owner(user_id) {
            Ok(statuses) => statuses,
            Err(err) => {
                error!(
                    "event=status_list module={MODULE} status=error error_code={} key={user_id} error={err}",
                    err.code()
                );
                Vec::new()
            }
        }
    }

    /// Number of stored statuses.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    /// Applies the owner policy, then inserts `status`.
    pub(crate) fn insert<U: UserRepository>(
        &self,
        status: &Status,
        user_collection: &UserCollection<U>,
    ) -> Result<(), CollectionError> {
        if self.owner_policy == OwnerPolicy::RequireExisting
            && user_collection.search_user(&status.user_id).is_none()
        {
            return Err(CollectionError::MissingOwner(status.user_id.clone()));
        }
        self.repo.insert(status).map_err(CollectionError::from)
    }
}
