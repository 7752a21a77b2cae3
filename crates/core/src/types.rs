//! Shared type aliases.

/// Timestamp type used across models (timestamptz in the database).
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version tag reported for services still on bundled static templates.
pub const LEGACY_TEMPLATE_VERSION: &str = "legacy";
