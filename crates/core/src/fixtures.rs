//! Seed data for the directory.
//!
//! The built-in fixtures are the demonstration patients and records every fresh process starts
//! with. A YAML document with the same shape can replace them:
//!
//! ```yaml
//! patients:
//!   - id: "1"
//!     name: Sarah Johnson
//!     age: 34
//!     gender: female
//!     phone: "+1-555-0123"
//!     email: sarah.johnson@email.com
//!     dateOfBirth: 1990-03-15
//!     allergies: [Peanuts]
//! records:
//!   - id: "1"
//!     patientId: "1"
//!     type: vitals
//!     date: 2024-01-15
//!     title: Routine Vitals Check
//!     details: { bp: 140/90 }
//!     provider: Dr. Smith
//! ```
//!
//! Nothing is ever written back; the fixtures are the whole lifecycle of the data.

use crate::config::FixtureSource;
use crate::patient::{Gender, Patient};
use crate::record::{MedicalRecord, RecordDate, RecordDetails, RecordKind};
use crate::{PatientError, PatientResult};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid fixture date"),
    }
}

const SARAH_BORN: NaiveDate = ymd(1990, 3, 15);
const MICHAEL_BORN: NaiveDate = ymd(1979, 7, 22);
const EMILY_BORN: NaiveDate = ymd(1996, 11, 8);
const JAN_08: NaiveDate = ymd(2024, 1, 8);
const JAN_10: NaiveDate = ymd(2024, 1, 10);
const JAN_12: NaiveDate = ymd(2024, 1, 12);
const JAN_15: NaiveDate = ymd(2024, 1, 15);

/// Patients and records to seed a directory with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixtures {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub records: Vec<MedicalRecord>,
}

impl Fixtures {
    /// The built-in demonstration data set.
    pub fn builtin() -> Self {
        Self {
            patients: builtin_patients(),
            records: builtin_records(),
        }
    }

    /// Load fixtures from the configured source.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::FixtureRead`] if the file cannot be read, or
    /// [`PatientError::FixtureParse`] if it is not a valid fixture document.
    pub fn load(source: &FixtureSource) -> PatientResult<Self> {
        match source {
            FixtureSource::Builtin => Ok(Self::builtin()),
            FixtureSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(PatientError::FixtureRead)?;
                let fixtures = Self::parse(&text)?;
                tracing::info!(
                    path = %path.display(),
                    patients = fixtures.patients.len(),
                    records = fixtures.records.len(),
                    "loaded fixtures"
                );
                Ok(fixtures)
            }
        }
    }

    /// Parse a fixture document from YAML text.
    ///
    /// Schema mismatches are reported with the path of the failing field (for example
    /// `records[0].type`). Duplicate ids, and records whose `patientId` names no fixture
    /// patient, are rejected.
    pub fn parse(yaml_text: &str) -> PatientResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let fixtures = match serde_path_to_error::deserialize::<_, Fixtures>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(PatientError::FixtureParse(format!(
                    "schema mismatch at {path}: {source}"
                )));
            }
        };

        fixtures.validate()?;
        Ok(fixtures)
    }

    fn validate(&self) -> PatientResult<()> {
        let mut patient_ids = HashSet::new();
        for patient in &self.patients {
            if !patient_ids.insert(patient.id.as_str()) {
                return Err(PatientError::FixtureParse(format!(
                    "duplicate patient id '{}'",
                    patient.id
                )));
            }
        }

        let mut record_ids = HashSet::new();
        for record in &self.records {
            if !record_ids.insert(record.id.as_str()) {
                return Err(PatientError::FixtureParse(format!(
                    "duplicate record id '{}'",
                    record.id
                )));
            }
            if !patient_ids.contains(record.patient_id.as_str()) {
                return Err(PatientError::FixtureParse(format!(
                    "record '{}' references unknown patient '{}'",
                    record.id, record.patient_id
                )));
            }
        }

        Ok(())
    }
}

fn builtin_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".into(),
            name: "Sarah Johnson".into(),
            age: 34,
            gender: Gender::Female,
            phone: "+1-555-0123".into(),
            email: "sarah.johnson@email.com".into(),
            date_of_birth: SARAH_BORN,
            last_visit: Some(JAN_15),
            allergies: vec!["Peanuts".into(), "Shellfish".into()],
            conditions: vec!["Hypertension".into()],
        },
        Patient {
            id: "2".into(),
            name: "Michael Chen".into(),
            age: 45,
            gender: Gender::Male,
            phone: "+1-555-0124".into(),
            email: "michael.chen@email.com".into(),
            date_of_birth: MICHAEL_BORN,
            last_visit: Some(JAN_10),
            allergies: vec!["Latex".into()],
            conditions: vec!["Diabetes Type 2".into()],
        },
        Patient {
            id: "3".into(),
            name: "Emily Rodriguez".into(),
            age: 28,
            gender: Gender::Female,
            phone: "+1-555-0125".into(),
            email: "emily.rodriguez@email.com".into(),
            date_of_birth: EMILY_BORN,
            last_visit: Some(JAN_12),
            allergies: vec![],
            conditions: vec![],
        },
    ]
}

fn builtin_records() -> Vec<MedicalRecord> {
    vec![
        MedicalRecord {
            id: "1".into(),
            patient_id: "1".into(),
            kind: RecordKind::Vitals,
            date: RecordDate::from_date(JAN_15),
            title: "Routine Vitals Check".into(),
            details: RecordDetails::fields([
                ("bp", "140/90"),
                ("hr", "75"),
                ("temp", "98.6°F"),
                ("weight", "145 lbs"),
            ]),
            provider: "Dr. Smith".into(),
        },
        MedicalRecord {
            id: "2".into(),
            patient_id: "1".into(),
            kind: RecordKind::Lab,
            date: RecordDate::from_date(JAN_10),
            title: "Blood Panel Results".into(),
            details: RecordDetails::fields([
                ("cholesterol", "200 mg/dL"),
                ("glucose", "110 mg/dL"),
                ("hba1c", "5.8%"),
            ]),
            provider: "City Lab".into(),
        },
        MedicalRecord {
            id: "3".into(),
            patient_id: "2".into(),
            kind: RecordKind::Medication,
            date: RecordDate::from_date(JAN_08),
            title: "Metformin Prescription".into(),
            details: RecordDetails::fields([
                ("medication", "Metformin"),
                ("dosage", "500mg"),
                ("frequency", "Twice daily"),
            ]),
            provider: "Dr. Johnson".into(),
        },
    ]
}
