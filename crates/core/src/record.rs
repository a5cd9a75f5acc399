//! Medical record entity and its value types.
//!
//! A record is a single dated clinical event belonging to one patient. Records are immutable
//! once stored; the only mutation the core supports is appending new ones.

use crate::{PatientError, PatientResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RECORD KIND
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Vitals,
    Medication,
    Lab,
    Visit,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Vitals => "vitals",
            RecordKind::Medication => "medication",
            RecordKind::Lab => "lab",
            RecordKind::Visit => "visit",
        }
    }

    /// Human-facing label used in timeline legends.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Vitals => "Vitals",
            RecordKind::Medication => "Medication",
            RecordKind::Lab => "Lab Results",
            RecordKind::Visit => "Visit",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vitals" => Ok(RecordKind::Vitals),
            "medication" => Ok(RecordKind::Medication),
            "lab" => Ok(RecordKind::Lab),
            "visit" => Ok(RecordKind::Visit),
            other => Err(PatientError::InvalidInput(format!(
                "unknown record type '{other}' (expected vitals, medication, lab or visit)"
            ))),
        }
    }
}

// ============================================================================
// RECORD DATE
// ============================================================================

/// A record timestamp, always held in UTC.
///
/// Accepted input forms:
/// - `YYYY-MM-DD` (midnight UTC, remembered as date-only)
/// - RFC 3339 with an offset, e.g. `2024-02-01T09:30:00+01:00`
/// - naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, taken as UTC
///
/// Date-only values render back as `YYYY-MM-DD`; anything else renders as RFC 3339 in `Z` form,
/// including an explicit midnight. Ordering is by instant first, so a date-only value sorts
/// before an explicit midnight on the same day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordDate {
    at: DateTime<Utc>,
    date_only: bool,
}

impl RecordDate {
    pub fn parse(input: &str) -> PatientResult<Self> {
        let input = input.trim();

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
                return Ok(Self::from_datetime(naive.and_utc()));
            }
        }

        Err(PatientError::InvalidInput(format!(
            "invalid record date '{input}'"
        )))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            at: date.and_time(NaiveTime::MIN).and_utc(),
            date_only: true,
        }
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            at: dt,
            date_only: false,
        }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }

    /// Whether this value was given as a calendar date with no time of day.
    pub fn is_date_only(&self) -> bool {
        self.date_only
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.date_only {
            write!(f, "{}", self.at.format("%Y-%m-%d"))
        } else {
            f.write_str(&self.at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
    }
}

impl FromStr for RecordDate {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordDate::parse(s)
    }
}

impl Serialize for RecordDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordDate::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DETAILS PAYLOAD
// ============================================================================

/// A single value inside a structured details payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Ordered field-name to scalar mapping.
///
/// Field order is the order in which fields were first inserted (or appeared in the source
/// document). Re-inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailFields(Vec<(String, Scalar)>);

impl DetailFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for DetailFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = DetailFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl Serialize for DetailFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DetailFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = DetailFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to scalar values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = DetailFields::new();
                while let Some((k, v)) = access.next_entry::<String, Scalar>()? {
                    fields.insert(k, v);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// The details payload of a record: free text or structured fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDetails {
    Text(String),
    Fields(DetailFields),
}

impl RecordDetails {
    pub fn fields<K, V, I>(iter: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        RecordDetails::Fields(iter.into_iter().collect())
    }
}

impl From<&str> for RecordDetails {
    fn from(value: &str) -> Self {
        RecordDetails::Text(value.to_string())
    }
}

impl From<String> for RecordDetails {
    fn from(value: String) -> Self {
        RecordDetails::Text(value)
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A record that has not been stored yet and so has no id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMedicalRecord {
    pub patient_id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub date: RecordDate,
    pub title: String,
    pub details: RecordDetails,
    pub provider: String,
}

impl NewMedicalRecord {
    pub(crate) fn with_id(self, id: String) -> MedicalRecord {
        MedicalRecord {
            id,
            patient_id: self.patient_id,
            kind: self.kind,
            date: self.date,
            title: self.title,
            details: self.details,
            provider: self.provider,
        }
    }
}

/// A single dated clinical event belonging to one patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub date: RecordDate,
    pub title: String,
    pub details: RecordDetails,
    pub provider: String,
}

impl MedicalRecord {
    /// The record's content without its id.
    pub fn to_new(&self) -> NewMedicalRecord {
        NewMedicalRecord {
            patient_id: self.patient_id.clone(),
            kind: self.kind,
            date: self.date,
            title: self.title.clone(),
            details: self.details.clone(),
            provider: self.provider.clone(),
        }
    }
}
