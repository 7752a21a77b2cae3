//! Template version model.
//!
//! One row per registered revision of a migrated service's template.
//! Rows are created by the publishing tooling in `PENDING` or
//! `PUBLISHED` state; this service only ever transitions
//! `PENDING` → `PUBLISHED` and never creates or deletes rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use sar_core::status::TemplateVersionStatus;
use sar_core::types::Timestamp;

/// A `template_versions` row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TemplateVersion {
    pub id: Uuid,
    pub service_configuration_id: Uuid,
    /// Monotonic per-service version number.
    pub version: i32,
    /// `PENDING` or `PUBLISHED` (see [`TemplateVersionStatus`]).
    pub status: String,
    /// Lowercase hex SHA-256 of the template body bytes.
    pub file_hash: String,
    pub created_at: Timestamp,
    /// Set exactly once, by the publish transition.
    pub published_at: Option<Timestamp>,
}

impl TemplateVersion {
    /// Whether this row is in the given status.
    pub fn is_status(&self, status: TemplateVersionStatus) -> bool {
        self.status == status.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_row(status: &str) -> TemplateVersion {
        TemplateVersion {
            id: Uuid::nil(),
            service_configuration_id: Uuid::nil(),
            version: 1,
            status: status.into(),
            file_hash: "0".repeat(64),
            created_at: chrono::Utc::now(),
            published_at: None,
        }
    }

    #[test]
    fn status_check_matches_db_values() {
        assert!(version_row("PENDING").is_status(TemplateVersionStatus::Pending));
        assert!(!version_row("PENDING").is_status(TemplateVersionStatus::Published));
        assert!(version_row("PUBLISHED").is_status(TemplateVersionStatus::Published));
    }
}
