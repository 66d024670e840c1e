//! Status update domain model.

use super::{validate_identifier, validate_required, ValidationError};
use serde::{Deserialize, Serialize};

/// One status update posted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Primary key.
    pub status_id: String,
    /// Owning user. Not guaranteed to exist in the user collection.
    pub user_id: String,
    pub status_text: String,
}

impl Status {
    pub fn new(
        status_id: impl Into<String>,
        user_id: impl Into<String>,
        status_text: impl Into<String>,
    ) -> Self {
        Self {
            status_id: status_id.into(),
            user_id: user_id.into(),
            status_text: status_text.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_identifier("status_id", &self.status_id)?;
        validate_identifier("user_id", &self.user_id)?;
        validate_required("status_text", &self.status_text)
    }
}
