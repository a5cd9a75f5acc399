//! # HealthSync Core
//!
//! The patient directory and record query service behind the HealthSync dashboards.
//!
//! This crate contains pure, in-memory data operations:
//! - Patient Store: the seeded patient list and free-text search
//! - Record Store: per-patient timelines and record appends
//! - Selection State: the patient currently being viewed
//! - Session: a mock identity provider supplying the signed-in role
//!
//! Everything is seeded from fixtures at startup and lost when the process exits.
//!
//! **No presentation concerns**: routing, dashboards and forms belong to the callers. The
//! [`timeline`] module stops at display-ready strings.

pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod fixtures;
pub mod patient;
pub mod record;
pub mod repositories;
pub mod selection;
pub mod session;
pub mod timeline;
pub mod validation;

pub use config::{CoreConfig, FixtureSource, OrphanPolicy};
pub use directory::{Directory, PatientProfile, SharedDirectory};
pub use error::{PatientError, PatientResult};
pub use fixtures::Fixtures;
pub use patient::{Gender, Patient};
pub use record::{
    DetailFields, MedicalRecord, NewMedicalRecord, RecordDate, RecordDetails, RecordKind, Scalar,
};
pub use repositories::patients::PatientStore;
pub use repositories::records::RecordStore;
pub use selection::Selection;
pub use session::{IdentityProvider, Role, Session, SessionUser};
pub use timeline::{DetailRow, DetailsView, TimelineEntry};
pub use validation::RecordDraft;

pub use healthsync_types::{NonEmptyText, TextError};
pub use healthsync_uuid::CanonicalUuid;
