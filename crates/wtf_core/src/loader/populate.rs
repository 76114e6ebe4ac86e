//! All-or-nothing bulk load.
//!
//! # Responsibility
//! - Validate the source file before storage is touched.
//! - Run every insert of one file inside a single `IMMEDIATE` transaction.
//!
//! # Invariants
//! - Any storage or read error rolls back the whole file.
//! - Only one load may run per store at a time; this is not enforced beyond
//!   SQLite's write lock, which makes a second loader wait or fail.

use super::parser::parse_line;
use crate::db::migrations::apply_migrations;
use crate::db::{Database, DbError};
use crate::repo::acronym_repo::{RepoError, SqliteAcronymStore};
use crate::service::registry::AcronymRegistry;
use log::{debug, error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type LoadResult<T> = Result<T, LoadError>;

/// Fatal bulk-load failure. Storage is unchanged when this is returned.
#[derive(Debug)]
pub enum LoadError {
    /// Source path is missing or not a regular file.
    InvalidSource(PathBuf),
    /// Source could not be opened or read (including invalid UTF-8).
    Io(io::Error),
    /// Schema bootstrap or transaction control failed.
    Db(DbError),
    /// The migrated connection could not back a store.
    Store(RepoError),
    /// A store call failed while processing `line` (1-based).
    Storage { line: usize, source: RepoError },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSource(path) => write!(f, "invalid acronym file: {}", path.display()),
            Self::Io(err) => write!(f, "failed to read acronym file: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "acronym store unavailable: {err}"),
            Self::Storage { line, source } => {
                write!(f, "failed to populate the database at line {line}: {source}")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSource(_) => None,
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Storage { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for LoadError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LoadError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Line counters for one committed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read from the source.
    pub lines: usize,
    /// Lines matching the definition grammar.
    pub parsed: usize,
    /// New records created.
    pub inserted: usize,
    /// Parsed lines whose exact pair already existed.
    pub duplicates: usize,
    /// Parsed lines rejected by validation (e.g. oversized translation).
    pub skipped: usize,
}

/// Administrative bulk loader bound to a database handle.
pub struct Loader {
    db: Database,
}

impl Loader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Loads every definition in `path`, all-or-nothing.
    ///
    /// # Errors
    /// - [`LoadError::InvalidSource`] before any storage access when `path`
    ///   is not an existing regular file.
    /// - Any other variant after the transaction was rolled back.
    pub fn populate_from_file(&self, path: impl AsRef<Path>) -> LoadResult<LoadReport> {
        let path = path.as_ref();
        if !path.is_file() {
            error!(
                "event=load_start module=loader status=error error_code=invalid_source path={}",
                path.display()
            );
            return Err(LoadError::InvalidSource(path.to_path_buf()));
        }

        let file = File::open(path)?;
        info!(
            "event=load_start module=loader status=start path={}",
            path.display()
        );
        self.db
            .with_connection(|conn| populate(conn, BufReader::new(file)))
    }
}

/// Loads definitions from `reader` into `conn` inside one transaction.
///
/// Ensures the schema exists first; safe on an empty database file.
pub fn populate<R: BufRead>(conn: &mut Connection, reader: R) -> LoadResult<LoadReport> {
    let started_at = Instant::now();
    apply_migrations(conn)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match load_lines(&tx, reader) {
        Ok(report) => {
            tx.commit()?;
            info!(
                "event=load_commit module=loader status=ok duration_ms={} lines={} parsed={} inserted={} duplicates={} skipped={}",
                started_at.elapsed().as_millis(),
                report.lines,
                report.parsed,
                report.inserted,
                report.duplicates,
                report.skipped
            );
            Ok(report)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                error!(
                    "event=load_rollback module=loader status=error error_code=rollback_failed error={}",
                    rollback_err
                );
            }
            error!(
                "event=load_rollback module=loader status=ok duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn load_lines<R: BufRead>(conn: &Connection, reader: R) -> LoadResult<LoadReport> {
    let store = SqliteAcronymStore::try_new(conn).map_err(LoadError::Store)?;
    let registry = AcronymRegistry::new(store);
    let mut report = LoadReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        report.lines += 1;

        let Some(parsed) = parse_line(&line) else {
            debug!("event=load_line module=loader status=skip_unparsed line={line_no}");
            continue;
        };
        report.parsed += 1;

        match registry.insert_if_absent(parsed.acronym, parsed.translation) {
            Ok(true) => report.inserted += 1,
            Ok(false) => report.duplicates += 1,
            Err(RepoError::Validation(err)) => {
                warn!(
                    "event=load_line module=loader status=skip_invalid line={} error={}",
                    line_no, err
                );
                report.skipped += 1;
            }
            Err(source) => {
                return Err(LoadError::Storage {
                    line: line_no,
                    source,
                })
            }
        }
    }

    Ok(report)
}
