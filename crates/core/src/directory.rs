//! Patient Directory.
//!
//! The single store object an application builds at startup and hands to every consumer. It
//! owns the patient and record repositories plus the selection state, and is where rules that
//! span entities (not-found handling, the orphan-record policy) are applied.
//!
//! Queries take `&self` and mutations take `&mut self`, so within one thread the borrow checker
//! already guarantees a single writer. [`SharedDirectory`] gives the same guarantee across
//! threads with a read/write lock.

use crate::config::{CoreConfig, OrphanPolicy};
use crate::fixtures::Fixtures;
use crate::patient::Patient;
use crate::record::{MedicalRecord, NewMedicalRecord};
use crate::repositories::patients::PatientStore;
use crate::repositories::records::RecordStore;
use crate::selection::Selection;
use crate::{PatientError, PatientResult};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything a profile view needs for one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientProfile {
    pub patient: Patient,
    /// The patient's records, most recent first.
    pub records: Vec<MedicalRecord>,
}

#[derive(Clone, Debug)]
pub struct Directory {
    cfg: CoreConfig,
    patients: PatientStore,
    records: RecordStore,
    selection: Selection,
}

impl Directory {
    /// Builds a directory seeded from the configured fixture source.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture file is configured and cannot be read or parsed.
    pub fn new(cfg: CoreConfig) -> PatientResult<Self> {
        let fixtures = Fixtures::load(cfg.fixtures())?;
        Ok(Self::from_fixtures(cfg, fixtures))
    }

    pub fn from_fixtures(cfg: CoreConfig, fixtures: Fixtures) -> Self {
        tracing::debug!(
            patients = fixtures.patients.len(),
            records = fixtures.records.len(),
            orphan_policy = %cfg.orphan_policy(),
            "directory initialised"
        );
        Self {
            cfg,
            patients: PatientStore::new(fixtures.patients),
            records: RecordStore::new(fixtures.records),
            selection: Selection::new(),
        }
    }

    /// A directory over the built-in fixtures with default configuration.
    pub fn seeded() -> Self {
        Self::from_fixtures(CoreConfig::default(), Fixtures::builtin())
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn patients(&self) -> &PatientStore {
        &self.patients
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn search(&self, query: &str) -> Vec<Patient> {
        self.patients.search(query)
    }

    /// Looks a patient up by id.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] when no patient has this id.
    pub fn patient(&self, id: &str) -> PatientResult<&Patient> {
        self.patients
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// The records of `patient_id`, most recent first. Unknown ids yield an empty list.
    pub fn records_for(&self, patient_id: &str) -> Vec<MedicalRecord> {
        self.records.get_by_patient(patient_id)
    }

    /// The patient plus their timeline.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] when no patient has this id.
    pub fn profile(&self, id: &str) -> PatientResult<PatientProfile> {
        let patient = self.patient(id)?.clone();
        let records = self.records_for(id);
        Ok(PatientProfile { patient, records })
    }

    /// Appends a record, applying the configured [`OrphanPolicy`].
    ///
    /// # Errors
    ///
    /// Under [`OrphanPolicy::Reject`], returns [`PatientError::OrphanRecord`] when
    /// `record.patient_id` names no patient; the store is left unchanged.
    pub fn append_record(&mut self, record: NewMedicalRecord) -> PatientResult<MedicalRecord> {
        if !self.patients.contains(&record.patient_id) {
            match self.cfg.orphan_policy() {
                OrphanPolicy::Reject => {
                    return Err(PatientError::OrphanRecord(record.patient_id));
                }
                OrphanPolicy::Accept => {
                    tracing::warn!(
                        patient_id = %record.patient_id,
                        "appending record for unknown patient"
                    );
                }
            }
        }
        Ok(self.records.append(record))
    }

    pub fn select(&mut self, patient: Patient) {
        self.selection.select(patient);
    }

    /// Selects the stored patient with this id.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] when no patient has this id; the selection is left
    /// unchanged.
    pub fn select_by_id(&mut self, id: &str) -> PatientResult<&Patient> {
        let patient = self.patient(id)?.clone();
        self.selection.select(patient);
        self.patient(id)
    }

    pub fn current(&self) -> Option<&Patient> {
        self.selection.current()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

/// A [`Directory`] shareable across threads: many readers or one writer at a time.
#[derive(Clone, Debug)]
pub struct SharedDirectory {
    inner: Arc<RwLock<Directory>>,
}

impl SharedDirectory {
    pub fn new(directory: Directory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(directory)),
        }
    }

    /// Acquires shared read access.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::LockPoisoned`] if a writer panicked while holding the lock.
    pub fn read(&self) -> PatientResult<RwLockReadGuard<'_, Directory>> {
        self.inner.read().map_err(|_| PatientError::LockPoisoned)
    }

    /// Acquires exclusive write access.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::LockPoisoned`] if a writer panicked while holding the lock.
    pub fn write(&self) -> PatientResult<RwLockWriteGuard<'_, Directory>> {
        self.inner.write().map_err(|_| PatientError::LockPoisoned)
    }

    pub fn search(&self, query: &str) -> PatientResult<Vec<Patient>> {
        Ok(self.read()?.search(query))
    }

    pub fn records_for(&self, patient_id: &str) -> PatientResult<Vec<MedicalRecord>> {
        Ok(self.read()?.records_for(patient_id))
    }

    pub fn profile(&self, id: &str) -> PatientResult<PatientProfile> {
        self.read()?.profile(id)
    }

    pub fn append_record(&self, record: NewMedicalRecord) -> PatientResult<MedicalRecord> {
        self.write()?.append_record(record)
    }

    pub fn select(&self, patient: Patient) -> PatientResult<()> {
        self.write()?.select(patient);
        Ok(())
    }

    pub fn current(&self) -> PatientResult<Option<Patient>> {
        Ok(self.read()?.current().cloned())
    }
}
