//! Per-service template health model.
//!
//! At most one row per migrated service configuration, enforced by a
//! unique constraint. Created lazily on first resolution; updated only
//! when the status actually changes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use sar_core::status::TemplateHealth;
use sar_core::types::Timestamp;

/// A `template_version_health_statuses` row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TemplateVersionHealthStatus {
    pub id: Uuid,
    pub service_configuration_id: Uuid,
    /// `HEALTHY` or `UNHEALTHY` (see [`TemplateHealth`]).
    pub status: String,
    pub last_modified: Timestamp,
}

impl TemplateVersionHealthStatus {
    /// Whether this row is in the given health state.
    pub fn is_status(&self, status: TemplateHealth) -> bool {
        self.status == status.as_str()
    }
}
