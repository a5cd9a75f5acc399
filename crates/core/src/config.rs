//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! [`Directory`](crate::Directory). Nothing in the core reads environment variables while
//! answering queries; the `*_from_env_value` helpers take the already-read value so binaries
//! decide where it comes from.

use crate::{PatientError, PatientResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the directory's seed data comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FixtureSource {
    /// The built-in demonstration patients and records.
    #[default]
    Builtin,
    /// A YAML fixture document on disk.
    File(PathBuf),
}

/// What [`Directory::append_record`](crate::Directory::append_record) does with a record whose
/// `patient_id` matches no patient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Store it anyway and log a warning.
    #[default]
    Accept,
    /// Refuse it with [`PatientError::OrphanRecord`].
    Reject,
}

impl FromStr for OrphanPolicy {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(OrphanPolicy::Accept),
            "reject" => Ok(OrphanPolicy::Reject),
            other => Err(PatientError::InvalidInput(format!(
                "unknown orphan policy '{other}' (expected 'accept' or 'reject')"
            ))),
        }
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrphanPolicy::Accept => "accept",
            OrphanPolicy::Reject => "reject",
        })
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    fixtures: FixtureSource,
    orphan_policy: OrphanPolicy,
}

impl CoreConfig {
    pub fn new(fixtures: FixtureSource, orphan_policy: OrphanPolicy) -> Self {
        Self {
            fixtures,
            orphan_policy,
        }
    }

    pub fn fixtures(&self) -> &FixtureSource {
        &self.fixtures
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }
}

/// Resolve the fixture source from an optional path value.
///
/// `None` or a blank value selects the built-in fixtures. Anything else must name an existing
/// regular file.
pub fn fixture_source_from_env_value(value: Option<String>) -> PatientResult<FixtureSource> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(raw) = value else {
        return Ok(FixtureSource::Builtin);
    };

    let path = Path::new(&raw);
    if !path.is_file() {
        return Err(PatientError::InvalidInput(format!(
            "fixture file does not exist: {}",
            path.display()
        )));
    }
    Ok(FixtureSource::File(path.to_path_buf()))
}

/// Parse the orphan policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`OrphanPolicy::Accept`].
pub fn orphan_policy_from_env_value(value: Option<String>) -> PatientResult<OrphanPolicy> {
    let value = value.filter(|v| !v.trim().is_empty());
    let parsed = value.map(|v| v.parse::<OrphanPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
