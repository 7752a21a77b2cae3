//! Repository for the `template_version_health_statuses` table.

use sqlx::PgPool;
use uuid::Uuid;

use sar_core::status::TemplateHealth;

use crate::models::TemplateVersionHealthStatus;

/// Column list for template_version_health_statuses queries.
const COLUMNS: &str = "id, service_configuration_id, status, last_modified";

/// Health-row persistence. Row uniqueness and change-only updates are
/// both enforced in SQL so concurrent first-resolutions and concurrent
/// status flips need no application-level coordination.
pub struct TemplateVersionHealthRepo;

impl TemplateVersionHealthRepo {
    /// Find the health row for a service, if one exists yet.
    pub async fn find_by_service(
        pool: &PgPool,
        service_configuration_id: Uuid,
    ) -> Result<Option<TemplateVersionHealthStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_version_health_statuses \
             WHERE service_configuration_id = $1"
        );
        sqlx::query_as::<_, TemplateVersionHealthStatus>(&query)
            .bind(service_configuration_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a `HEALTHY` row for a service unless one already exists.
    ///
    /// `ON CONFLICT DO NOTHING` against the unique constraint makes a
    /// lost creation race benign: the loser simply affects zero rows.
    pub async fn insert_healthy(
        pool: &PgPool,
        service_configuration_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO template_version_health_statuses \
                (service_configuration_id, status, last_modified) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (service_configuration_id) DO NOTHING",
        )
        .bind(service_configuration_id)
        .bind(TemplateHealth::Healthy.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set a service's health status only if it actually differs.
    ///
    /// The status guard lives in the WHERE clause, not in a prior read,
    /// so concurrent updaters cannot interleave a lost update.
    pub async fn update_if_changed(
        pool: &PgPool,
        service_configuration_id: Uuid,
        status: TemplateHealth,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE template_version_health_statuses \
             SET status = $2, last_modified = NOW() \
             WHERE service_configuration_id = $1 AND status <> $2",
        )
        .bind(service_configuration_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
