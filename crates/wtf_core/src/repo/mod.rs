//! Storage interface for acronym records and its SQLite implementation.
//!
//! # Responsibility
//! - Define the minimal persistence contract the registry is built on.
//! - Isolate SQL details from registry/loader orchestration.
//!
//! # Invariants
//! - Stores never check (acronym, translation) uniqueness; the registry does.
//! - Stores only ever see normalized, validated input (`NewAcronym`).

pub mod acronym_repo;
