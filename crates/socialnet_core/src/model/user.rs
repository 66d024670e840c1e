//! User domain model.
//!
//! # Invariants
//! - `user_id` is the primary key and never changes after creation.
//! - `status_count` is maintained by the status collection, never by
//!   user-facing updates.

use super::{validate_identifier, validate_required, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// One member of the user collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub user_id: String,
    pub user_name: String,
    pub user_last_name: String,
    pub email: String,
    /// Number of stored status updates whose `user_id` is this user.
    #[serde(default)]
    pub status_count: u32,
}

impl User {
    /// Creates a user with no attached statuses.
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        user_last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_last_name: user_last_name.into(),
            email: email.into(),
            status_count: 0,
        }
    }

    /// Checks field shape before the record reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_identifier("user_id", &self.user_id)?;
        validate_required("user_name", &self.user_name)?;
        validate_required("user_last_name", &self.user_last_name)?;
        validate_email(&self.email)
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_required("email", email)?;
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
