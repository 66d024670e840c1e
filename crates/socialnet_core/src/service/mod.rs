//! Collection services and the bulk loader.
//!
//! # Responsibility
//! - Expose user/status CRUD as success flags, absorbing repository errors.
//! - Stream CSV files into collections with skip-on-duplicate semantics.
//!
//! # Invariants
//! - No repository or I/O error escapes a collection's boolean API.
//! - Every absorbed failure is logged with a stable `error_code`.

pub mod loader;
pub mod status_collection;
pub mod user_collection;

use crate::repo::{RepoError, RepoResult};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a collection write before it is reduced to a flag.
#[derive(Debug)]
pub enum CollectionError {
    Repo(RepoError),
    /// Owner check was requested and the referenced user is absent.
    MissingOwner(String),
}

impl CollectionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Repo(err) => err.code(),
            Self::MissingOwner(_) => "missing_owner",
        }
    }

    /// True when the target primary key already exists.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Repo(RepoError::DuplicateKey(_)))
    }

    /// True when the row itself is unacceptable, as opposed to a store fault.
    pub fn is_rejected_record(&self) -> bool {
        matches!(
            self,
            Self::MissingOwner(_) | Self::Repo(RepoError::Validation(_))
        )
    }
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::MissingOwner(user_id) => write!(f, "owning user not found: {user_id}"),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MissingOwner(_) => None,
        }
    }
}

impl From<RepoError> for CollectionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Reduces a write result to a success flag, logging the outcome.
///
/// Expected rejections (duplicate, missing key, bad input) log at `warn`;
/// store faults log at `error`.
pub(crate) fn absorb(
    event: &str,
    module: &str,
    key: &str,
    result: Result<(), CollectionError>,
) -> bool {
    match result {
        Ok(()) => {
            debug!("event={event} module={module} status=ok key={key}");
            true
        }
        Err(err @ CollectionError::Repo(RepoError::Db(_))) => {
            error!(
                "event={event} module={module} status=error error_code={} key={key} error={err}",
                err.code()
            );
            false
        }
        Err(err) => {
            warn!(
                "event={event} module={module} status=error error_code={} key={key} error={err}",
                err.code()
            );
            false
        }
    }
}

/// Reduces a lookup result to an optional record, logging store faults.
pub(crate) fn absorb_lookup<T>(
    event: &str,
    module: &str,
    key: &str,
    result: RepoResult<Option<T>>,
) -> Option<T> {
    match result {
        Ok(Some(found)) => {
            debug!("event={event} module={module} status=ok found=true key={key}");
            Some(found)
        }
        Ok(None) => {
            debug!("event={event} module={module} status=ok found=false key={key}");
            None
        }
        Err(err) => {
            error!(
                "event={event} module={module} status=error error_code={} key={key} error={err}",
                err.code()
            );
            None
        }
    }
}
