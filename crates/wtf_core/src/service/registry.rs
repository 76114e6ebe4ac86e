//! Acronym registry.
//!
//! # Responsibility
//! - Mediate every read/write of acronym records.
//! - Classify read results so callers can tell "nothing known" apart from
//!   "store unavailable".
//!
//! # Invariants
//! - Acronyms are uppercased before any store call.
//! - `insert_if_absent` never stores a second copy of an exact
//!   (acronym, translation) pair.
//! - Duplicate detection is byte-for-byte on the translation.
//! - The check-then-insert sequence is not atomic across connections; bulk
//!   loads must run one at a time per store.

use crate::model::acronym::{normalize_acronym, AcronymRecord, NewAcronym};
use crate::repo::acronym_repo::{AcronymStore, RepoError, RepoResult};
use log::debug;

/// Outcome of a fail-soft registry read.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    /// At least one item matched.
    Found(Vec<T>),
    /// The store answered, with nothing to report.
    NoMatch,
    /// The store could not answer.
    Unavailable(RepoError),
}

impl<T> QueryOutcome<T> {
    /// Classifies a raw store result.
    pub fn from_result(result: RepoResult<Vec<T>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::NoMatch,
            Ok(items) => Self::Found(items),
            Err(err) => Self::Unavailable(err),
        }
    }

    /// Flattens to the wire shape: failures become an empty list.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Found(items) => items,
            Self::NoMatch | Self::Unavailable(_) => Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Invariant-preserving facade over a store implementation.
pub struct AcronymRegistry<S: AcronymStore> {
    store: S,
}

impl<S: AcronymStore> AcronymRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts `(acronym, translation)` unless that exact pair already exists.
    ///
    /// Returns `Ok(true)` when a record was created and `Ok(false)` for a
    /// duplicate.
    ///
    /// # Errors
    /// - [`RepoError::Validation`] for blank or oversized input.
    /// - Store errors unchanged.
    pub fn insert_if_absent(&self, acronym: &str, translation: &str) -> RepoResult<bool> {
        let input = NewAcronym::new(acronym, translation)?;
        let existing = self.store.find_by_acronym(input.acronym())?;
        if existing
            .iter()
            .any(|record| record.translation == input.translation())
        {
            debug!(
                "event=acronym_insert module=registry status=duplicate acronym={}",
                input.acronym()
            );
            return Ok(false);
        }

        let record = self.store.insert(input)?;
        debug!(
            "event=acronym_insert module=registry status=ok acronym={} id={}",
            record.acronym, record.id
        );
        Ok(true)
    }

    /// Known translations for `acronym`, in storage order.
    pub fn translate(&self, acronym: &str) -> QueryOutcome<String> {
        let acronym = normalize_acronym(acronym);
        QueryOutcome::from_result(self.store.find_by_acronym(&acronym).map(|records| {
            records
                .into_iter()
                .map(|record| record.translation)
                .collect()
        }))
    }

    /// Distinct known acronyms, ascending.
    pub fn list_acronyms(&self) -> QueryOutcome<String> {
        QueryOutcome::from_result(self.store.list_distinct_acronyms())
    }

    /// Every record, grouped by acronym.
    pub fn entries(&self) -> QueryOutcome<AcronymRecord> {
        QueryOutcome::from_result(self.store.list_records())
    }
}
