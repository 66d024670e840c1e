//! Bulk CSV loader for the user and status collections.
//!
//! # Responsibility
//! - Stream a comma-delimited file into a collection, one row per add.
//! - Apply skip-on-duplicate per row and the configured malformed-row policy.
//!
//! # Invariants
//! - The first line is a header: discarded, never parsed or validated.
//! - A duplicate primary key skips only that row; later rows still load.
//! - A load is not transactional: rows committed before an abort stay.
//! - A missing file aborts before anything is opened or inserted.

use super::status_collection::StatusCollection;
use super::user_collection::UserCollection;
use super::CollectionError;
use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::status_repo::StatusRepository;
use crate::repo::user_repo::UserRepository;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

const MODULE: &str = "loader";

/// What to do with a row that cannot become a valid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Stop the load at the first malformed row.
    #[default]
    Abort,
    /// Record the row as malformed and continue with the next one.
    Skip,
}

/// Tuning knobs for a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub malformed_rows: MalformedRowPolicy,
}

impl LoadOptions {
    pub fn skip_malformed() -> Self {
        Self {
            malformed_rows: MalformedRowPolicy::Skip,
        }
    }
}

/// Condition that stopped a load before the end of the file.
#[derive(Debug)]
pub enum LoadError {
    FileNotFound(PathBuf),
    /// The file could not be opened or its header line could not be read.
    Io(std::io::Error),
    /// A record could not be read, e.g. invalid UTF-8.
    Csv(csv::Error),
    MalformedRow { line: u64, reason: String },
    /// The store failed for reasons unrelated to the row's content.
    Store(CollectionError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file does not exist: {}", path.display()),
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::MalformedRow { line, reason } => {
                write!(f, "malformed row at line {line}: {reason}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::FileNotFound(_) | Self::MalformedRow { .. } => None,
        }
    }
}

/// Outcome counters of one bulk load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Data rows pulled from the file (header excluded).
    pub rows_read: u64,
    pub inserted: u64,
    /// Rows skipped because their primary key was already stored.
    pub duplicates: u64,
    /// Rows rejected as malformed, whether skipped or aborting.
    pub malformed: u64,
    /// Set when the load stopped before consuming the whole file.
    pub aborted: Option<LoadError>,
}

impl LoadReport {
    /// True only when the file was fully consumed and every row inserted.
    pub fn is_success(&self) -> bool {
        self.aborted.is_none() && self.duplicates == 0 && self.malformed == 0
    }
}

enum RowError {
    Malformed(String),
    Write(CollectionError),
}

impl From<CollectionError> for RowError {
    fn from(value: CollectionError) -> Self {
        Self::Write(value)
    }
}

/// Loads `user_id,user_name,user_last_name,email` rows into `user_collection`.
pub fn load_users<R: UserRepository>(
    path: impl AsRef<Path>,
    user_collection: &UserCollection<R>,
    options: &LoadOptions,
) -> LoadReport {
    load_rows("user_load", path.as_ref(), options, |record| {
        let [user_id, user_name, user_last_name, email] = columns(record)?;
        let user = User::new(user_id, user_name, user_last_name, email);
        user_collection.insert(&user)?;
        Ok(())
    })
}

/// Loads `status_id,user_id,status_text` rows into `status_collection`.
///
/// `user_collection` is handed to every add so the status collection's
/// owner policy can consult it.
pub fn load_status_updates<S: StatusRepository, U: UserRepository>(
    path: impl AsRef<Path>,
    status_collection: &StatusCollection<S>,
    user_collection: &UserCollection<U>,
    options: &LoadOptions,
) -> LoadReport {
    load_rows("status_load", path.as_ref(), options, |record| {
        let [status_id, user_id, status_text] = columns(record)?;
        let status = Status::new(status_id, user_id, status_text);
        status_collection.insert(&status, user_collection)?;
        Ok(())
    })
}

fn load_rows<F>(event: &str, path: &Path, options: &LoadOptions, mut apply: F) -> LoadReport
where
    F: FnMut(&StringRecord) -> Result<(), RowError>,
{
    let started_at = Instant::now();
    let mut report = LoadReport::default();

    if !path.is_file() {
        warn!(
            "event={event} module={MODULE} status=error error_code=file_not_found path={}",
            path.display()
        );
        report.aborted = Some(LoadError::FileNotFound(path.to_path_buf()));
        return report;
    }

    let mut source = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            warn!(
                "event={event} module={MODULE} status=error error_code=open_failed path={} error={err}",
                path.display()
            );
            report.aborted = Some(LoadError::Io(err));
            return report;
        }
    };

    // Header: dropped as raw bytes so it is never parsed or validated.
    let mut header = Vec::new();
    if let Err(err) = source.read_until(b'\n', &mut header) {
        warn!(
            "event={event} module={MODULE} status=error error_code=header_unreadable path={} error={err}",
            path.display()
        );
        report.aborted = Some(LoadError::Io(err));
        return report;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                report.aborted = Some(LoadError::Csv(err));
                break;
            }
        };
        report.rows_read += 1;
        // Positions restart after the dropped header line.
        let line = record.position().map_or(0, |position| position.line() + 1);

        let reason = match apply(&record) {
            Ok(()) => {
                report.inserted += 1;
                continue;
            }
            Err(RowError::Write(err)) if err.is_duplicate() => {
                report.duplicates += 1;
                warn!(
                    "event={event} module={MODULE} status=skipped error_code=duplicate_key line={line} error={err}"
                );
                continue;
            }
            Err(RowError::Write(err)) if err.is_rejected_record() => err.to_string(),
            Err(RowError::Malformed(reason)) => reason,
            Err(RowError::Write(err)) => {
                report.aborted = Some(LoadError::Store(err));
                break;
            }
        };

        report.malformed += 1;
        warn!(
            "event={event} module={MODULE} status=skipped error_code=malformed_row line={line} error={reason}"
        );
        if options.malformed_rows == MalformedRowPolicy::Abort {
            report.aborted = Some(LoadError::MalformedRow { line, reason });
            break;
        }
    }

    let status = if report.is_success() { "ok" } else { "error" };
    let aborted = report
        .aborted
        .as_ref()
        .map_or_else(|| "none".to_string(), ToString::to_string);
    info!(
        "event={event} module={MODULE} status={status} rows_read={} inserted={} duplicates={} malformed={} aborted={aborted} duration_ms={}",
        report.rows_read,
        report.inserted,
        report.duplicates,
        report.malformed,
        started_at.elapsed().as_millis()
    );

    report
}

/// Takes the first `N` columns of `record`; extra trailing columns are ignored.
fn columns<const N: usize>(record: &StringRecord) -> Result<[&str; N], RowError> {
    if record.len() < N {
        return Err(RowError::Malformed(format!(
            "expected {N} columns, found {}",
            record.len()
        )));
    }

    let mut fields = [""; N];
    for (slot, value) in fields.iter_mut().zip(record.iter()) {
        *slot = value;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{columns, LoadReport, RowError};
    use csv::StringRecord;

    #[test]
    fn columns_ignores_extra_trailing_fields() {
        let record = StringRecord::from(vec!["a", "b", "c", "d", "extra"]);
        let [first, _, _, last] = columns::<4>(&record).ok().unwrap();
        assert_eq!(first, "a");
        assert_eq!(last, "d");
    }

    #[test]
    fn columns_rejects_short_rows() {
        let record = StringRecord::from(vec!["a", "b"]);
        match columns::<3>(&record) {
            Err(RowError::Malformed(reason)) => assert!(reason.contains("expected 3")),
            _ => panic!("short row must be malformed"),
        }
    }

    #[test]
    fn empty_report_is_success() {
        assert!(LoadReport::default().is_success());
    }
}
