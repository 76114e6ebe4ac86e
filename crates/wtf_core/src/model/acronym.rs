//! Acronym record and validated insert input.
//!
//! # Responsibility
//! - Represent one (acronym, translation) pair as stored.
//! - Normalize and validate caller input before it reaches storage.
//!
//! # Invariants
//! - `acronym` is uppercase, non-empty and free of spaces/tabs.
//! - `translation` is non-empty, at most [`MAX_TRANSLATION_CHARS`] characters,
//!   and keeps the caller's casing byte-for-byte.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Upper bound on translation length, in characters.
pub const MAX_TRANSLATION_CHARS: usize = 300;

/// Opaque storage key assigned on insert.
pub type AcronymId = Uuid;

/// One persisted acronym expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymRecord {
    /// Storage key. Carries no meaning beyond identity.
    pub id: AcronymId,
    /// Uppercase acronym.
    pub acronym: String,
    /// Expansion text, case preserved.
    pub translation: String,
}

/// Validated input for a single insert.
///
/// Only constructible through [`NewAcronym::new`], so every value that
/// reaches a store is already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAcronym {
    acronym: String,
    translation: String,
}

impl NewAcronym {
    /// Normalizes `acronym` to uppercase and validates both fields.
    ///
    /// # Errors
    /// - Returns [`AcronymValidationError`] when either field breaks the
    ///   module invariants.
    pub fn new(
        acronym: impl AsRef<str>,
        translation: impl Into<String>,
    ) -> Result<Self, AcronymValidationError> {
        let acronym = normalize_acronym(acronym.as_ref());
        let translation = translation.into();

        if acronym.is_empty() {
            return Err(AcronymValidationError::EmptyAcronym);
        }
        if acronym.contains([' ', '\t']) {
            return Err(AcronymValidationError::AcronymContainsWhitespace(acronym));
        }
        if translation.trim().is_empty() {
            return Err(AcronymValidationError::EmptyTranslation);
        }
        let chars = translation.chars().count();
        if chars > MAX_TRANSLATION_CHARS {
            return Err(AcronymValidationError::TranslationTooLong {
                chars,
                max: MAX_TRANSLATION_CHARS,
            });
        }

        Ok(Self {
            acronym,
            translation,
        })
    }

    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Attaches a storage-assigned id, producing the persisted shape.
    pub fn into_record(self, id: AcronymId) -> AcronymRecord {
        AcronymRecord {
            id,
            acronym: self.acronym,
            translation: self.translation,
        }
    }
}

/// Canonical form used for both storage and comparison.
pub fn normalize_acronym(acronym: &str) -> String {
    acronym.trim().to_uppercase()
}

/// Rejected insert input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcronymValidationError {
    EmptyAcronym,
    AcronymContainsWhitespace(String),
    EmptyTranslation,
    TranslationTooLong { chars: usize, max: usize },
}

impl Display for AcronymValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAcronym => write!(f, "acronym cannot be empty"),
            Self::AcronymContainsWhitespace(_) => {
                write!(f, "acronym cannot contain spaces or tabs")
            }
            Self::EmptyTranslation => write!(f, "translation cannot be empty"),
            Self::TranslationTooLong { chars, max } => {
                write!(f, "translation has {chars} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for AcronymValidationError {}

#[cfg(test)]
mod tests {
    use super::{normalize_acronym, AcronymValidationError, NewAcronym, MAX_TRANSLATION_CHARS};
    use uuid::Uuid;

    #[test]
    fn new_uppercases_acronym_and_keeps_translation_case() {
        let input = NewAcronym::new("lol", "Laughing Out Loud").unwrap();
        assert_eq!(input.acronym(), "LOL");
        assert_eq!(input.translation(), "Laughing Out Loud");
    }

    #[test]
    fn normalize_trims_surrounding_whitespace() {
        assert_eq!(normalize_acronym("  api\t"), "API");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert_eq!(
            NewAcronym::new("  ", "x").unwrap_err(),
            AcronymValidationError::EmptyAcronym
        );
        assert_eq!(
            NewAcronym::new("FOO", " \t").unwrap_err(),
            AcronymValidationError::EmptyTranslation
        );
    }

    #[test]
    fn new_rejects_inner_whitespace_in_acronym() {
        let err = NewAcronym::new("A B", "split").unwrap_err();
        assert!(!err.to_string().contains("A B"));
        assert!(matches!(err, AcronymValidationError::AcronymContainsWhitespace(v) if v == "A B"));
    }

    #[test]
    fn translation_length_is_counted_in_characters() {
        let at_limit = "é".repeat(MAX_TRANSLATION_CHARS);
        assert!(NewAcronym::new("E", at_limit).is_ok());

        let over = "x".repeat(MAX_TRANSLATION_CHARS + 1);
        let err = NewAcronym::new("X", over).unwrap_err();
        assert_eq!(
            err,
            AcronymValidationError::TranslationTooLong {
                chars: MAX_TRANSLATION_CHARS + 1,
                max: MAX_TRANSLATION_CHARS
            }
        );
    }

    #[test]
    fn into_record_attaches_id() {
        let id = Uuid::new_v4();
        let record = NewAcronym::new("wtf", "What The Fudge").unwrap().into_record(id);
        assert_eq!(record.id, id);
        assert_eq!(record.acronym, "WTF");
    }
}
