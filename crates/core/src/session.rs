//! Session / identity provider.
//!
//! A local stand-in for authentication: any email and password are accepted and produce a
//! session user with the requested role. Directory operations never consult the session; it
//! only tells callers who is signed in and in which role, so they can decide what to show.

use crate::constants::{MOCK_DOCTOR_LICENSE_ID, MOCK_LAB_ID, MOCK_USER_ID};
use crate::{PatientError, PatientResult};
use healthsync_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Lab,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Lab => "lab",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "doctor" => Ok(Role::Doctor),
            "lab" => Ok(Role::Lab),
            "admin" => Ok(Role::Admin),
            other => Err(PatientError::InvalidInput(format!(
                "unknown role '{other}' (expected doctor, lab or admin)"
            ))),
        }
    }
}

/// The signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_id: Option<String>,
}

/// What presentation code needs to know about the current identity.
pub trait IdentityProvider {
    /// The signed-in role, or `None` when nobody is signed in.
    fn current_role(&self) -> Option<Role>;

    fn is_authenticated(&self) -> bool;
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in as `role`. The password is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::ValidationFailure`] on field `email` if the email is blank or has
    /// nothing before its `@`.
    pub fn login(
        &mut self,
        email: &str,
        _password: &str,
        role: Role,
    ) -> PatientResult<&SessionUser> {
        let email = NonEmptyText::new(email)
            .map_err(|_| PatientError::validation("email", "email is required"))?;
        let local_part = email.as_str().split('@').next().unwrap_or_default();
        if local_part.is_empty() {
            return Err(PatientError::validation(
                "email",
                "email must have a name before '@'",
            ));
        }

        let user = SessionUser {
            id: MOCK_USER_ID.to_string(),
            name: display_name_from_local_part(local_part),
            email: email.into_string(),
            role,
            license_id: (role == Role::Doctor).then(|| MOCK_DOCTOR_LICENSE_ID.to_string()),
            lab_id: (role == Role::Lab).then(|| MOCK_LAB_ID.to_string()),
        };

        tracing::info!(role = %role, name = %user.name, "session started");
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(role = %user.role, "session ended");
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }
}

impl IdentityProvider for Session {
    fn current_role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// `sarah.johnson` -> `Sarah Johnson`.
fn display_name_from_local_part(local_part: &str) -> String {
    local_part
        .split('.')
        .map(|piece| {
            let mut chars = piece.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
