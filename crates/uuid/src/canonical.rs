//! The [`CanonicalUuid`] wrapper.

use std::fmt;
use uuid::Uuid;

/// A v4 UUID that always renders as 32 lowercase hex characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalUuid(Uuid);

impl Default for CanonicalUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalUuid {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Purely syntactic check: 32 bytes, `0-9a-f` only.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for CanonicalUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_renders_canonical_form() {
        let id = CanonicalUuid::new().to_string();
        assert_eq!(id.len(), 32);
        assert!(CanonicalUuid::is_canonical(&id), "{id} should be canonical");
    }

    #[test]
    fn test_generated_ids_differ() {
        let a = CanonicalUuid::new();
        let b = CanonicalUuid::new();
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_is_canonical_rejects_other_spellings() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "",
            "zz0e8400e29b41d4a716446655440000",
        ] {
            assert!(!CanonicalUuid::is_canonical(input), "input {input:?}");
        }
        assert!(CanonicalUuid::is_canonical("550e8400e29b41d4a716446655440000"));
    }

    #[test]
    fn test_short_numeric_ids_are_not_canonical() {
        assert!(!CanonicalUuid::is_canonical("1"));
        assert!(!CanonicalUuid::is_canonical("1705276800000"));
    }
}
