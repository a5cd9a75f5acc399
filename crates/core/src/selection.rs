//! Selection State.
//!
//! Remembers which patient is "active" so a view reached after a search (for example a
//! profile page) knows who it is showing. There are two states and one transition:
//!
//! ```text
//! Unselected --select(p)--> Selected(p) --select(q)--> Selected(q)
//! ```
//!
//! Nothing moves back to `Unselected`; a fresh `Selection` is the only way to get there.

use crate::patient::Patient;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(Patient),
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `patient` the current selection, replacing any previous one.
    ///
    /// The patient is not checked against any store.
    pub fn select(&mut self, patient: Patient) {
        tracing::info!(patient_id = %patient.id, "patient selected");
        *self = Selection::Selected(patient);
    }

    pub fn current(&self) -> Option<&Patient> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(patient) => Some(patient),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }
}
