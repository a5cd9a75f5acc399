#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("invalid {field}: {reason}")]
    ValidationFailure { field: &'static str, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read fixture file: {0}")]
    FixtureRead(std::io::Error),
    #[error("failed to parse fixtures: {0}")]
    FixtureParse(String),

    #[error("record references unknown patient: {0}")]
    OrphanRecord(String),
    #[error("directory lock poisoned")]
    LockPoisoned,
}

impl PatientError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        PatientError::ValidationFailure {
            field,
            reason: reason.into(),
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
