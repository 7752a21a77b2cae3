//! Service configuration model.
//!
//! One row per downstream service the renderer knows about. Rows are
//! managed by configuration tooling; the rendering pipeline only reads
//! them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use sar_core::types::Timestamp;

/// Estate category a service belongs to.
pub const CATEGORY_PRISON: &str = "PRISON";
/// Community/probation estate category.
pub const CATEGORY_PROBATION: &str = "PROBATION";

/// A `service_configurations` row.
///
/// `template_migrated = true` means the service's template is tracked
/// in `template_versions` and must be resolved through the version
/// resolver, never loaded from the bundled static resources.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    pub id: Uuid,
    /// Stable machine name, also the template and document key segment.
    pub service_name: String,
    /// Human-readable label shown in rendered reports.
    pub label: String,
    /// Base URL of the downstream service.
    pub url: String,
    /// Display ordering within a report.
    pub list_order: i32,
    pub enabled: bool,
    pub template_migrated: bool,
    /// `PRISON` or `PROBATION`.
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
