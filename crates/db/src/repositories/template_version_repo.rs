//! Repository for the `template_versions` table.

use sqlx::PgPool;
use uuid::Uuid;

use sar_core::status::TemplateVersionStatus;

use crate::models::TemplateVersion;

/// Column list for template_versions queries.
const COLUMNS: &str =
    "id, service_configuration_id, version, status, file_hash, created_at, published_at";

/// Queries and the single permitted state transition for template
/// versions. Rows are created by the publishing tooling; this service
/// never inserts or deletes them.
pub struct TemplateVersionRepo;

impl TemplateVersionRepo {
    /// Find the latest version for (service, hash) in the given status.
    ///
    /// Callers check `PUBLISHED` first, then `PENDING`; a published
    /// match short-circuits any publish attempt.
    pub async fn find_latest_by_hash(
        pool: &PgPool,
        service_configuration_id: Uuid,
        file_hash: &str,
        status: TemplateVersionStatus,
    ) -> Result<Option<TemplateVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_versions \
             WHERE service_configuration_id = $1 AND file_hash = $2 AND status = $3 \
             ORDER BY version DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, TemplateVersion>(&query)
            .bind(service_configuration_id)
            .bind(file_hash)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Conditionally transition a `PENDING` row to `PUBLISHED`.
    ///
    /// The WHERE clause pins id, version, hash and current status so a
    /// concurrent publisher (or a superseded row) makes this affect zero
    /// rows instead of clobbering state. Returns the number of rows
    /// affected; exactly one means this caller won the transition.
    pub async fn publish_pending(
        pool: &PgPool,
        id: Uuid,
        version: i32,
        file_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE template_versions \
             SET status = $1, published_at = NOW() \
             WHERE id = $2 AND version = $3 AND file_hash = $4 AND status = $5",
        )
        .bind(TemplateVersionStatus::Published.as_str())
        .bind(id)
        .bind(version)
        .bind(file_hash)
        .bind(TemplateVersionStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
