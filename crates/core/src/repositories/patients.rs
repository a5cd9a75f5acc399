//! Patient Store.
//!
//! Holds the canonical, read-only list of patients in insertion order and answers the
//! free-text queries behind every patient search box.
//!
//! ## Search semantics
//!
//! - A blank query (empty or whitespace only) returns every patient.
//! - Otherwise a patient matches when the lowercased query occurs in the lowercased name or
//!   email, or the raw query occurs in the phone number.
//! - Results keep store order. There is no ranking, and no match is an empty list rather than
//!   an error.

use crate::fixtures::Fixtures;
use crate::patient::Patient;

#[derive(Clone, Debug, Default)]
pub struct PatientStore {
    patients: Vec<Patient>,
}

impl PatientStore {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// A store holding the built-in demonstration patients.
    pub fn seeded() -> Self {
        Self::new(Fixtures::builtin().patients)
    }

    /// Returns the patients matching `query`, in store order.
    pub fn search(&self, query: &str) -> Vec<Patient> {
        if query.trim().is_empty() {
            return self.patients.clone();
        }

        let lowered = query.to_lowercase();
        let matches: Vec<Patient> = self
            .patients
            .iter()
            .filter(|p| p.matches_query(query, &lowered))
            .cloned()
            .collect();

        tracing::debug!(query, matches = matches.len(), "patient search");
        matches
    }

    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
