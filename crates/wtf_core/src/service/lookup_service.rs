//! Remote lookup procedures.
//!
//! # Responsibility
//! - Answer `wtf_is` and `list` for remote callers.
//! - Publish the static procedure catalog used by transports and help pages.
//!
//! # Invariants
//! - Procedures are read-only and never return an error: backend failures
//!   are logged and answered with an empty list.
//! - [`PROCEDURES`] is the single source of procedure names and arity.

use crate::db::Database;
use crate::model::acronym::AcronymRecord;
use crate::repo::acronym_repo::{RepoResult, SqliteAcronymStore};
use crate::service::registry::{AcronymRegistry, QueryOutcome};
use log::{debug, warn};
use serde::Serialize;

/// Procedures callable over the remote interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Procedure {
    WtfIs,
    List,
}

impl Procedure {
    /// Wire name of the procedure.
    pub fn name(self) -> &'static str {
        match self {
            Self::WtfIs => "wtf_is",
            Self::List => "list",
        }
    }
}

/// Catalog entry describing one remote procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcedureDoc {
    #[serde(skip)]
    pub procedure: Procedure,
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub description: &'static str,
}

pub const PROCEDURES: &[ProcedureDoc] = &[
    ProcedureDoc {
        procedure: Procedure::WtfIs,
        name: "wtf_is",
        params: &["acronym"],
        description: "Returns a list of translations available for `acronym`.",
    },
    ProcedureDoc {
        procedure: Procedure::List,
        name: "list",
        params: &[],
        description: "Returns a list of acronyms available on the server.",
    },
];

/// Looks up a catalog entry by its wire name.
pub fn find_procedure(name: &str) -> Option<&'static ProcedureDoc> {
    PROCEDURES.iter().find(|doc| doc.name == name)
}

/// Read-only service answering remote lookups against a shared database.
#[derive(Clone)]
pub struct LookupService {
    db: Database,
}

impl LookupService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All translations known for `acronym`, case-insensitively.
    pub fn wtf_is(&self, acronym: &str) -> Vec<String> {
        respond(
            Procedure::WtfIs,
            self.query(|registry| registry.translate(acronym)),
        )
    }

    /// All distinct acronyms, ascending.
    pub fn list(&self) -> Vec<String> {
        respond(
            Procedure::List,
            self.query(|registry| registry.list_acronyms()),
        )
    }

    /// Every stored record, ordered by acronym. Same fail-soft policy.
    pub fn entries(&self) -> Vec<AcronymRecord> {
        let outcome = self.query(|registry| registry.entries());
        if let QueryOutcome::Unavailable(err) = &outcome {
            warn!("event=lookup module=lookup status=unavailable procedure=entries error={err}");
        }
        outcome.into_items()
    }

    fn query<T>(
        &self,
        read: impl FnOnce(&AcronymRegistry<SqliteAcronymStore<'_>>) -> QueryOutcome<T>,
    ) -> QueryOutcome<T> {
        let result = self.db.with_connection(|conn| -> RepoResult<QueryOutcome<T>> {
            let store = SqliteAcronymStore::try_new(conn)?;
            Ok(read(&AcronymRegistry::new(store)))
        });
        result.unwrap_or_else(QueryOutcome::Unavailable)
    }
}

fn respond(procedure: Procedure, outcome: QueryOutcome<String>) -> Vec<String> {
    match &outcome {
        QueryOutcome::Found(items) => debug!(
            "event=lookup module=lookup status=ok procedure={} results={}",
            procedure.name(),
            items.len()
        ),
        QueryOutcome::NoMatch => debug!(
            "event=lookup module=lookup status=no_match procedure={}",
            procedure.name()
        ),
        QueryOutcome::Unavailable(err) => warn!(
            "event=lookup module=lookup status=unavailable procedure={} error={}",
            procedure.name(),
            err
        ),
    }
    outcome.into_items()
}
