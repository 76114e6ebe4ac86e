//! Shared database handle.
//!
//! # Responsibility
//! - Hold one migrated SQLite connection for the lifetime of the process.
//! - Serialize access so read and write paths never interleave on it.
//!
//! # Invariants
//! - The wrapped connection has migrations fully applied.
//! - Callers receive the connection only for the duration of a closure.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Cloneable handle over a single migrated SQLite connection.
///
/// Created once at start-up and passed explicitly to the loader and lookup
/// service; the connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    /// Wraps an already configured connection.
    ///
    /// The caller is responsible for having applied migrations.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// # Errors
    /// - Returns [`DbError::Poisoned`] (converted into `E`) when a previous
    ///   caller panicked while holding the connection.
    /// - Otherwise returns whatever `f` returns.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut guard = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::db::DbError;

    #[test]
    fn clones_share_one_connection() {
        let db = Database::open_in_memory().unwrap();
        let other = db.clone();

        db.with_connection(|conn| {
            conn.execute_batch("CREATE TABLE scratch (value INTEGER);")
                .map_err(DbError::from)
        })
        .unwrap();

        let exists: i64 = other
            .with_connection(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE name = 'scratch';",
                    [],
                    |row| row.get(0),
                )
                .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(exists, 1);
    }
}
