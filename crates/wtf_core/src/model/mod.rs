//! Acronym domain model.
//!
//! # Responsibility
//! - Define the canonical acronym record and its write-side input shape.
//! - Own acronym normalization and input validation rules.
//!
//! # Invariants
//! - Acronyms are uppercase everywhere past this module's constructors.
//! - Records are immutable once persisted; there is no update shape.

pub mod acronym;
