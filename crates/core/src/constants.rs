//! Constants used throughout the HealthSync core crate.

/// Environment variable naming a YAML fixture document to seed the directory from.
pub const FIXTURES_ENV_VAR: &str = "HEALTHSYNC_FIXTURES";

/// Environment variable selecting the orphan-record policy (`accept` or `reject`).
pub const ORPHAN_POLICY_ENV_VAR: &str = "HEALTHSYNC_ORPHAN_POLICY";

/// Display format for timeline dates, e.g. `Jan 15, 2024`.
pub const TIMELINE_DATE_FORMAT: &str = "%b %-d, %Y";

/// Display format for timeline times, e.g. `09:30 AM`.
pub const TIMELINE_TIME_FORMAT: &str = "%I:%M %p";

/// Mock session user id; every login produces the same user.
pub const MOCK_USER_ID: &str = "1";

/// License id attached to mock doctor sessions.
pub const MOCK_DOCTOR_LICENSE_ID: &str = "MD12345";

/// Lab id attached to mock lab sessions.
pub const MOCK_LAB_ID: &str = "LAB789";
