//! Display-ready timeline entries.
//!
//! Turns stored records into the strings a timeline view shows: formatted dates, kind labels,
//! and a details view that branches on the [`RecordDetails`] tag rather than inspecting values
//! at runtime.

use crate::constants::{TIMELINE_DATE_FORMAT, TIMELINE_TIME_FORMAT};
use crate::record::{MedicalRecord, RecordDetails, RecordKind};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum DetailsView {
    /// Free-text details, shown as one paragraph.
    Paragraph(String),
    /// Structured details, one labelled row per field in source order.
    Rows(Vec<DetailRow>),
}

impl From<&RecordDetails> for DetailsView {
    fn from(details: &RecordDetails) -> Self {
        match details {
            RecordDetails::Text(text) => DetailsView::Paragraph(text.clone()),
            RecordDetails::Fields(fields) => DetailsView::Rows(
                fields
                    .iter()
                    .map(|(key, value)| DetailRow {
                        label: humanize_field_name(key),
                        value: value.to_string(),
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub record_id: String,
    pub kind: RecordKind,
    pub kind_label: &'static str,
    pub date: String,
    /// Present only when the record carries a time of day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub title: String,
    pub provider: String,
    pub details: DetailsView,
}

impl From<&MedicalRecord> for TimelineEntry {
    fn from(record: &MedicalRecord) -> Self {
        let at = record.date.datetime();
        TimelineEntry {
            record_id: record.id.clone(),
            kind: record.kind,
            kind_label: record.kind.label(),
            date: at.format(TIMELINE_DATE_FORMAT).to_string(),
            time: (!record.date.is_date_only())
                .then(|| at.format(TIMELINE_TIME_FORMAT).to_string()),
            title: record.title.clone(),
            provider: record.provider.clone(),
            details: DetailsView::from(&record.details),
        }
    }
}

/// Builds entries for `records`, keeping their order.
///
/// Callers normally pass the output of
/// [`RecordStore::get_by_patient`](crate::repositories::records::RecordStore::get_by_patient),
/// which is already most-recent-first.
pub fn timeline(records: &[MedicalRecord]) -> Vec<TimelineEntry> {
    records.iter().map(TimelineEntry::from).collect()
}

/// `bloodPressure` -> `Blood Pressure`, `hba1c` -> `Hba1c`.
///
/// A space goes before every uppercase letter, then each word gets an uppercase first letter.
pub fn humanize_field_name(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
