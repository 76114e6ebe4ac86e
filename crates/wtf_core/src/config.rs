//! Runtime configuration shared by the server and the loader.
//!
//! # Responsibility
//! - Resolve the database location from flags, environment and defaults.

use std::path::{Path, PathBuf};

/// Environment variable overriding the default database location.
pub const DB_PATH_ENV: &str = "WTF_DB_PATH";
/// File name used under the system temp directory when nothing is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "wtf-server.db";

/// Resolves the database file path.
///
/// Precedence: `explicit`, then a non-blank `WTF_DB_PATH`, then
/// `<temp_dir>/wtf-server.db`.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    resolve_db_path_with(explicit, std::env::var(DB_PATH_ENV).ok().as_deref())
}

fn resolve_db_path_with(explicit: Option<&Path>, env_value: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
