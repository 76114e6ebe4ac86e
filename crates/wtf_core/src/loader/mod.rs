//! Bulk population of the registry from acronym definition files.
//!
//! # Responsibility
//! - Parse `ACRONYM<ws>TRANSLATION` lines.
//! - Drive `insert_if_absent` for a whole file inside one transaction.
//!
//! # Invariants
//! - A load either commits every parsed line or leaves storage untouched.
//! - Malformed lines are skipped, never fatal.

mod parser;
mod populate;

pub use parser::{parse_line, ParsedLine};
pub use populate::{populate, LoadError, LoadReport, LoadResult, Loader};
