//! Expense identifier value object.

use std::fmt;

use uuid::Uuid;

use crate::ValidationError;

/// Byte offsets of the hyphens in the 8-4-4-4-12 layout.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Identifier of an [`Expense`](crate::Expense).
///
/// Always holds a hyphenated UUID in lowercase, so two ids that differ only
/// in letter case compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Generates a fresh random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Parses an externally supplied identifier.
    ///
    /// Only the hyphenated 8-4-4-4-12 hex form is accepted; braces, `urn:`
    /// prefixes and the simple (unhyphenated) form are rejected.
    ///
    /// Hex digits are normalized to lowercase, so `to_string` returns the
    /// lowercase form even when the input was upper-case.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("id", "Expense ID cannot be empty"));
        }
        if !is_hyphenated_uuid(value) {
            return Err(ValidationError::new("id", "Expense ID must be a valid UUID"));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_hyphenated_uuid(value: &str) -> bool {
    value.len() == 36
        && value.bytes().enumerate().all(|(i, b)| {
            if HYPHENS.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ExpenseId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn generate_yields_distinct_valid_ids() {
        let a = ExpenseId::generate();
        let b = ExpenseId::generate();
        assert_ne!(a, b);
        assert!(ExpenseId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn parse_accepts_valid_uuid() {
        let id = ExpenseId::parse(VALID).unwrap();
        assert_eq!(id.to_string(), VALID);
    }

    #[test]
    fn parse_normalizes_to_lowercase() {
        let upper = ExpenseId::parse(&VALID.to_uppercase()).unwrap();
        assert_eq!(upper, ExpenseId::parse(VALID).unwrap());
        assert_eq!(upper.to_string(), VALID);
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        for value in ["", "   "] {
            let err = ExpenseId::parse(value).unwrap_err();
            assert_eq!(err.field, "id");
            assert!(err.message.contains("empty"));
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for value in [
            "not-a-uuid",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "550e8400-e29b-41d4-a716-44665544000g",
            " 550e8400-e29b-41d4-a716-446655440000",
        ] {
            let err = ExpenseId::parse(value).unwrap_err();
            assert_eq!(err.field, "id");
            assert!(err.message.contains("valid UUID"), "{value}");
        }
    }
}
