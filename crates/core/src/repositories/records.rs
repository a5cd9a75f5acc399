//! Record Store.
//!
//! Holds medical records and serves per-patient timelines. Appending is the only mutation:
//! records are never edited or removed once stored.

use crate::fixtures::Fixtures;
use crate::record::{MedicalRecord, NewMedicalRecord};
use healthsync_uuid::CanonicalUuid;

#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<MedicalRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<MedicalRecord>) -> Self {
        Self { records }
    }

    /// A store holding the built-in demonstration records.
    pub fn seeded() -> Self {
        Self::new(Fixtures::builtin().records)
    }

    /// Returns the records owned by `patient_id`, most recent first.
    ///
    /// Records sharing an instant keep their insertion order (the sort is stable), whether
    /// their dates were given with or without a time of day.
    pub fn get_by_patient(&self, patient_id: &str) -> Vec<MedicalRecord> {
        let mut records: Vec<MedicalRecord> = self
            .records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.datetime().cmp(&a.date.datetime()));

        tracing::debug!(patient_id, records = records.len(), "patient timeline");
        records
    }

    /// Stores `record` under a freshly generated id and returns the stored copy.
    ///
    /// The id is a canonical UUID that does not collide with any id already in the store.
    /// No referential check is made on `patient_id`; see
    /// [`Directory::append_record`](crate::Directory::append_record) for policy enforcement.
    pub fn append(&mut self, record: NewMedicalRecord) -> MedicalRecord {
        let id = loop {
            let candidate = CanonicalUuid::new().to_string();
            if !self.contains(&candidate) {
                break candidate;
            }
        };

        let stored = record.with_id(id);
        tracing::info!(
            record_id = %stored.id,
            patient_id = %stored.patient_id,
            kind = %stored.kind,
            "medical record appended"
        );
        self.records.push(stored.clone());
        stored
    }

    pub fn get(&self, id: &str) -> Option<&MedicalRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn all(&self) -> &[MedicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordDate, RecordDetails, RecordKind};
    use std::collections::HashSet;

    fn new_record(patient_id: &str, date: &str, title: &str) -> NewMedicalRecord {
        NewMedicalRecord {
            patient_id: patient_id.into(),
            kind: RecordKind::Lab,
            date: RecordDate::parse(date).expect("test date should parse"),
            title: title.into(),
            details: RecordDetails::from("y"),
            provider: "Z".into(),
        }
    }

    fn ids(records: &[MedicalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_get_by_patient_sorts_most_recent_first() {
        let store = RecordStore::seeded();
        let records = store.get_by_patient("1");
        assert_eq!(ids(&records), vec!["1", "2"]);
        assert!(records[0].date > records[1].date);
    }

    #[test]
    fn test_get_by_patient_without_records_is_empty() {
        let store = RecordStore::seeded();
        assert!(store.get_by_patient("3").is_empty());
        assert!(store.get_by_patient("no-such-patient").is_empty());
    }

    #[test]
    fn test_get_by_patient_matches_ids_exactly() {
        let mut store = RecordStore::seeded();
        store.append(new_record("11", "2024-05-01", "other patient"));
        assert!(store
            .get_by_patient("1")
            .iter()
            .all(|r| r.patient_id == "1"));
        assert_eq!(store.get_by_patient("11").len(), 1);
    }

    #[test]
    fn test_get_by_patient_is_stable_for_equal_dates() {
        let mut store = RecordStore::new(vec![]);
        let first = store.append(new_record("5", "2024-03-01", "first"));
        let older = store.append(new_record("5", "2024-02-01", "older"));
        let second = store.append(new_record("5", "2024-03-01", "second"));
        let third = store.append(new_record("5", "2024-03-01", "third"));

        let timeline = store.get_by_patient("5");
        assert_eq!(
            ids(&timeline),
            vec![
                first.id.as_str(),
                second.id.as_str(),
                third.id.as_str(),
                older.id.as_str()
            ]
        );
    }

    #[test]
    fn test_date_only_and_explicit_midnight_keep_insertion_order() {
        let mut store = RecordStore::new(vec![]);
        let explicit = store.append(new_record("5", "2024-03-01T00:00:00Z", "explicit"));
        let date_only = store.append(new_record("5", "2024-03-01", "date only"));

        let timeline = store.get_by_patient("5");
        assert_eq!(ids(&timeline), vec![explicit.id.as_str(), date_only.id.as_str()]);
    }

    #[test]
    fn test_append_skips_ids_already_in_store() {
        let taken: Vec<String> = (0..3).map(|_| CanonicalUuid::new().to_string()).collect();
        let mut store = RecordStore::new(
            taken
                .iter()
                .map(|id| new_record("1", "2024-01-01", "seeded").with_id(id.clone()))
                .collect(),
        );

        for _ in 0..5 {
            let stored = store.append(new_record("1", "2024-01-02", "new"));
            assert!(!taken.contains(&stored.id));
        }
        let unique: HashSet<&str> = store.all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_append_assigns_unique_fresh_id() {
        let mut store = RecordStore::seeded();
        let existing: HashSet<String> = store.all().iter().map(|r| r.id.clone()).collect();

        let a = store.append(new_record("2", "2024-02-01", "X"));
        let b = store.append(new_record("2", "2024-02-01", "X"));

        assert!(!existing.contains(&a.id));
        assert!(!existing.contains(&b.id));
        assert_ne!(a.id, b.id);
        assert!(CanonicalUuid::is_canonical(&a.id));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_append_then_timeline_orders_against_existing_records() {
        let mut store = RecordStore::seeded();
        let input = new_record("2", "2024-02-01", "X");
        let stored = store.append(input.clone());

        let timeline = store.get_by_patient("2");
        assert_eq!(ids(&timeline), vec![stored.id.as_str(), "3"]);

        let fetched = &timeline[0];
        assert_eq!(fetched, &stored);
        assert_eq!(fetched.to_new(), input);
    }

    #[test]
    fn test_append_older_record_sorts_after_existing() {
        let mut store = RecordStore::seeded();
        let stored = store.append(new_record("2", "2023-12-31", "older"));
        assert_eq!(ids(&store.get_by_patient("2")), vec!["3", stored.id.as_str()]);
    }

    #[test]
    fn test_append_accepts_unknown_patient() {
        let mut store = RecordStore::seeded();
        let stored = store.append(new_record("404", "2024-02-01", "orphan"));
        assert_eq!(store.get_by_patient("404"), vec![stored]);
    }

    #[test]
    fn test_round_trip_preserves_every_field_but_id() {
        let mut store = RecordStore::new(vec![]);
        let input = NewMedicalRecord {
            patient_id: "1".into(),
            kind: RecordKind::Vitals,
            date: RecordDate::parse("2024-04-02T08:15:00Z").expect("should parse"),
            title: "Post-op vitals".into(),
            details: RecordDetails::fields([("bp", "118/76"), ("spo2", "98%")]),
            provider: "Ward 4".into(),
        };

        let stored = store.append(input.clone());
        let fetched = store.get_by_patient("1");

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, stored.id);
        assert_eq!(fetched[0].to_new(), input);
    }
}
