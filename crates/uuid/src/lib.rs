//! Canonical identifiers for HealthSync entities.
//!
//! Records appended at runtime need identifiers that never collide with the seeded ones or with
//! each other, no matter how quickly they are created. HealthSync uses a *canonical* UUID
//! representation for generated identifiers: **32 lowercase hexadecimal characters** (no
//! hyphens).
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Generating an identifier does not by itself rule out a clash: fixture documents may use any
//! string as an id, including one in canonical form. Stores that hand out identifiers must check
//! each candidate against the ids they already hold and draw again on a match.

mod canonical;

pub use canonical::CanonicalUuid;
