//! Acronym registry core for the WTF server.
//! This crate is the single source of truth for registry invariants.

pub mod config;
pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{Database, DbError};
pub use loader::{LoadError, LoadReport, LoadResult, Loader};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status};
pub use model::acronym::{AcronymId, AcronymRecord, AcronymValidationError, NewAcronym};
pub use repo::acronym_repo::{AcronymStore, RepoError, RepoResult, SqliteAcronymStore};
pub use service::lookup_service::{
    find_procedure, LookupService, Procedure, ProcedureDoc, PROCEDURES,
};
pub use service::registry::{AcronymRegistry, QueryOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
