//! Repository for the `service_configurations` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ServiceConfiguration;

/// Column list for service_configurations queries.
const COLUMNS: &str = "id, service_name, label, url, list_order, enabled, \
    template_migrated, category, created_at, updated_at";

/// Read-only queries over service configurations. Rows are managed by
/// configuration tooling, not by the rendering pipeline.
pub struct ServiceConfigurationRepo;

impl ServiceConfigurationRepo {
    /// Find a configuration by its primary key, regardless of flags.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ServiceConfiguration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_configurations WHERE id = $1");
        sqlx::query_as::<_, ServiceConfiguration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a configuration that is both enabled and template-migrated.
    ///
    /// The resolver re-checks through this query immediately before
    /// matching hashes, so a service disabled or un-migrated mid-request
    /// is caught rather than trusted from the caller's earlier copy.
    pub async fn find_enabled_migrated(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ServiceConfiguration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_configurations \
             WHERE id = $1 AND enabled = true AND template_migrated = true"
        );
        sqlx::query_as::<_, ServiceConfiguration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List enabled configurations in display order.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<ServiceConfiguration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_configurations \
             WHERE enabled = true \
             ORDER BY list_order ASC, service_name ASC"
        );
        sqlx::query_as::<_, ServiceConfiguration>(&query)
            .fetch_all(pool)
            .await
    }
}
