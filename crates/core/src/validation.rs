//! Input validation utilities.
//!
//! Stores accept whatever they are given. Forms do not: a record entered by a person must have
//! every field filled in before it reaches [`Directory::append_record`](crate::Directory). This
//! module turns raw form input into a [`NewMedicalRecord`] or a
//! [`PatientError::ValidationFailure`] naming the first offending field.

use crate::record::{DetailFields, NewMedicalRecord, RecordDate, RecordDetails, RecordKind};
use crate::{PatientError, PatientResult};
use healthsync_types::NonEmptyText;

/// Raw, unvalidated input for a new medical record.
///
/// `details_text` and `detail_fields` are mutually exclusive; each entry of `detail_fields` is a
/// `key=value` assignment.
#[derive(Clone, Debug, Default)]
pub struct RecordDraft {
    pub patient_id: String,
    pub kind: String,
    pub date: String,
    pub title: String,
    pub provider: String,
    pub details_text: Option<String>,
    pub detail_fields: Vec<String>,
}

impl RecordDraft {
    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::ValidationFailure`] with `field` set to one of `patient_id`,
    /// `type`, `date`, `title`, `provider` or `details`.
    pub fn validate(self) -> PatientResult<NewMedicalRecord> {
        let patient_id = required("patient_id", &self.patient_id)?;
        let kind = self
            .kind
            .parse::<RecordKind>()
            .map_err(|e| invalid("type", e))?;
        let date = RecordDate::parse(&self.date).map_err(|e| invalid("date", e))?;
        let title = required("title", &self.title)?;
        let provider = required("provider", &self.provider)?;
        let details = draft_details(self.details_text, &self.detail_fields)?;

        Ok(NewMedicalRecord {
            patient_id: patient_id.into_string(),
            kind,
            date,
            title: title.into_string(),
            details,
            provider: provider.into_string(),
        })
    }
}

fn required(field: &'static str, value: &str) -> PatientResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| PatientError::validation(field, "is required"))
}

fn invalid(field: &'static str, err: PatientError) -> PatientError {
    let reason = match err {
        PatientError::InvalidInput(reason) => reason,
        other => other.to_string(),
    };
    PatientError::validation(field, reason)
}

fn draft_details(text: Option<String>, fields: &[String]) -> PatientResult<RecordDetails> {
    match (text, fields.is_empty()) {
        (Some(_), false) => Err(PatientError::validation(
            "details",
            "give either free text or fields, not both",
        )),
        (Some(text), true) => {
            let text = required("details", &text)?;
            Ok(RecordDetails::Text(text.into_string()))
        }
        (None, false) => {
            let mut parsed = DetailFields::new();
            for assignment in fields {
                let (key, value) = parse_field_assignment(assignment)?;
                parsed.insert(key, value);
            }
            Ok(RecordDetails::Fields(parsed))
        }
        (None, true) => Err(PatientError::validation("details", "is required")),
    }
}

/// Splits `key=value` at the first `=`. The key is trimmed and must be non-empty; the value is
/// trimmed and may be empty.
pub fn parse_field_assignment(assignment: &str) -> PatientResult<(String, String)> {
    let Some((key, value)) = assignment.split_once('=') else {
        return Err(PatientError::validation(
            "details",
            format!("expected key=value, got '{assignment}'"),
        ));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(PatientError::validation(
            "details",
            format!("missing field name in '{assignment}'"),
        ));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
