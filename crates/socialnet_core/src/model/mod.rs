//! Domain records owned by the user and status collections.
//!
//! # Responsibility
//! - Define the `User` and `Status` value objects persisted in the store.
//! - Provide field validation shared by collections and the bulk loader.
//!
//! # Invariants
//! - Primary ids (`user_id`, `status_id`) are immutable once created.
//! - A `Status` references its owner only by `user_id`; the owner may be
//!   absent from the store (dangling references are representable).

pub mod status;
pub mod user;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for a domain record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty after trimming.
    EmptyField(&'static str),
    /// An identifier field contains whitespace.
    InvalidIdentifier { field: &'static str, value: String },
    /// Email does not have a `local@domain` shape.
    InvalidEmail(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::InvalidIdentifier { field, value } => {
                write!(f, "field `{field}` has invalid identifier `{value}`")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
