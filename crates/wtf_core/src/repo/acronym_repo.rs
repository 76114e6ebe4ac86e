//! Acronym store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide exact-match lookup, distinct listing and append-only insert over
//!   the `acronyms` table.
//! - Work unchanged inside an open transaction, so callers can roll back a
//!   whole batch of inserts.
//!
//! # Invariants
//! - `find_by_acronym` returns rows in insertion order.
//! - `list_distinct_acronyms` is sorted ascending and deduplicated.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::acronym::{
    normalize_acronym, AcronymRecord, AcronymValidationError, NewAcronym,
};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT rowid AS row_id, id, acronym, translation FROM acronyms";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for acronym persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AcronymValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted acronym data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<AcronymValidationError> for RepoError {
    fn from(value: AcronymValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract required by the registry.
pub trait AcronymStore {
    /// All records whose acronym equals the normalized `acronym`.
    fn find_by_acronym(&self, acronym: &str) -> RepoResult<Vec<AcronymRecord>>;
    /// Distinct acronyms, ascending.
    fn list_distinct_acronyms(&self) -> RepoResult<Vec<String>>;
    /// Appends one record and returns it with its assigned id.
    fn insert(&self, record: NewAcronym) -> RepoResult<AcronymRecord>;
    /// Every record, ordered by acronym then insertion order.
    fn list_records(&self) -> RepoResult<Vec<AcronymRecord>>;
}

impl<S: AcronymStore + ?Sized> AcronymStore for &S {
    fn find_by_acronym(&self, acronym: &str) -> RepoResult<Vec<AcronymRecord>> {
        (**self).find_by_acronym(acronym)
    }

    fn list_distinct_acronyms(&self) -> RepoResult<Vec<String>> {
        (**self).list_distinct_acronyms()
    }

    fn insert(&self, record: NewAcronym) -> RepoResult<AcronymRecord> {
        (**self).insert(record)
    }

    fn list_records(&self) -> RepoResult<Vec<AcronymRecord>> {
        (**self).list_records()
    }
}

/// SQLite-backed acronym store.
///
/// Borrows a connection, so a `rusqlite::Transaction` can be passed in
/// directly and every call joins that transaction.
pub struct SqliteAcronymStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAcronymStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when migrations were not applied.
    /// - [`RepoError::MissingRequiredTable`] when `acronyms` is gone.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AcronymStore for SqliteAcronymStore<'_> {
    fn find_by_acronym(&self, acronym: &str) -> RepoResult<Vec<AcronymRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE acronym = ?1
             ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([normalize_acronym(acronym)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn list_distinct_acronyms(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT acronym
             FROM acronyms
             ORDER BY acronym ASC;",
        )?;
        let acronyms = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(acronyms)
    }

    fn insert(&self, record: NewAcronym) -> RepoResult<AcronymRecord> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO acronyms (id, acronym, translation) VALUES (?1, ?2, ?3);",
            params![id.to_string(), record.acronym(), record.translation()],
        )?;
        Ok(record.into_record(id))
    }

    fn list_records(&self) -> RepoResult<Vec<AcronymRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             ORDER BY acronym ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let has_table: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'acronyms'
        );",
        [],
        |row| row.get(0),
    )?;
    if has_table == 0 {
        return Err(RepoError::MissingRequiredTable("acronyms"));
    }

    Ok(())
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<AcronymRecord> {
    // Messages name the rowid, never stored text.
    let row_id: i64 = row.get("row_id")?;
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid in acronyms.id at rowid {row_id}"))
    })?;

    let acronym: String = row.get("acronym")?;
    if acronym != normalize_acronym(&acronym) {
        return Err(RepoError::InvalidData(format!(
            "non-normalized value in acronyms.acronym at rowid {row_id}"
        )));
    }

    Ok(AcronymRecord {
        id,
        acronym,
        translation: row.get("translation")?,
    })
}
