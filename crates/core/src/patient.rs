//! Patient entity.
//!
//! Patients are seeded at startup and never mutated afterwards. Allergies and conditions are
//! always present; a source that omits them yields empty lists, so "absent" and "none known"
//! are the same thing once loaded.

use crate::PatientError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative gender as captured at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(PatientError::InvalidInput(format!(
                "unknown gender '{other}'"
            ))),
        }
    }
}

/// A person whose healthcare data is tracked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<NaiveDate>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl Patient {
    /// Whether this patient matches a free-text directory query.
    ///
    /// `lowered` must be `query.to_lowercase()`; it is passed in so a search over many
    /// patients lowercases the query once. Name and email compare case-insensitively, the
    /// phone number compares against the raw query.
    pub(crate) fn matches_query(&self, query: &str, lowered: &str) -> bool {
        self.name.to_lowercase().contains(lowered)
            || self.phone.contains(query)
            || self.email.to_lowercase().contains(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        Patient {
            id: "7".into(),
            name: "Ada Lovelace".into(),
            age: 36,
            gender: Gender::Female,
            phone: "+44-20-7946-0000".into(),
            email: "Ada.Lovelace@Example.org".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).expect("valid date"),
            last_visit: None,
            allergies: vec![],
            conditions: vec![],
        }
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let p = sample();
        assert!(p.matches_query("LOVE", "love"));
    }

    #[test]
    fn test_matches_email_case_insensitively() {
        let p = sample();
        assert!(p.matches_query("example.ORG", "example.org"));
    }

    #[test]
    fn test_matches_phone_literally() {
        let p = sample();
        assert!(p.matches_query("7946", "7946"));
        assert!(!p.matches_query("7946 0000", "7946 0000"));
    }

    #[test]
    fn test_gender_round_trips_through_str() {
        for g in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(g.as_str().parse::<Gender>().expect("should parse"), g);
        }
        assert!("Female".parse::<Gender>().is_err());
    }

    #[test]
    fn test_missing_optional_lists_deserialize_as_empty() {
        let json = r#"{
            "id": "9",
            "name": "No Lists",
            "age": 50,
            "gender": "other",
            "phone": "555",
            "email": "n@l.test",
            "dateOfBirth": "1974-02-01"
        }"#;
        let p: Patient = serde_json::from_str(json).expect("should deserialize");
        assert!(p.allergies.is_empty());
        assert!(p.conditions.is_empty());
        assert_eq!(p.last_visit, None);
    }
}
