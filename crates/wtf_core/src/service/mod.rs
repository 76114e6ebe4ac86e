//! Acronym use-case services.
//!
//! # Responsibility
//! - Enforce registry invariants on top of any [`AcronymStore`].
//! - Expose the read-only remote procedures and their static catalog.
//!
//! [`AcronymStore`]: crate::repo::acronym_repo::AcronymStore

pub mod lookup_service;
pub mod registry;
