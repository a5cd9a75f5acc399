//! In-memory repositories backing the directory.
//!
//! Each repository owns one entity list and exposes only the queries and mutations the
//! directory needs. Neither reaches into the other; cross-entity rules live in
//! [`Directory`](crate::Directory).

pub mod patients;
pub mod records;
