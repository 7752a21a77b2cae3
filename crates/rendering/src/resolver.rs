//! Template version resolution for migrated services.

use std::sync::Arc;

use sar_core::error::CoreError;
use sar_core::hashing::template_hash;
use sar_core::status::{TemplateHealth, TemplateVersionStatus};

use crate::health::TemplateVersionHealthTracker;
use crate::interfaces::{ConfigurationStore, LiveTemplateSource, TemplateVersionStore};
use crate::request::{RenderRequest, TemplateDetails};

/// Resolves the exact template body and version to render for a
/// migrated service, enforcing integrity between what the downstream
/// service currently serves and what has been registered centrally.
///
/// Matching is by SHA-256 hash, PUBLISHED before PENDING. A PENDING
/// match is auto-promoted via a conditional update, so an operator can
/// stage a new version and the first live request that observes the new
/// body rolls it out — no manual publish step. A hash matching nothing
/// is a terminal integrity failure, never rendered around.
pub struct TemplateVersionResolver {
    templates: Arc<dyn LiveTemplateSource>,
    versions: Arc<dyn TemplateVersionStore>,
    configurations: Arc<dyn ConfigurationStore>,
    health: Arc<TemplateVersionHealthTracker>,
}

impl TemplateVersionResolver {
    pub fn new(
        templates: Arc<dyn LiveTemplateSource>,
        versions: Arc<dyn TemplateVersionStore>,
        configurations: Arc<dyn ConfigurationStore>,
        health: Arc<TemplateVersionHealthTracker>,
    ) -> Self {
        Self {
            templates,
            versions,
            configurations,
            health,
        }
    }

    /// Resolve the template for a migrated service.
    ///
    /// Failures are terminal for this attempt; nothing here retries.
    pub async fn resolve(&self, request: &RenderRequest) -> Result<TemplateDetails, CoreError> {
        let requested = &request.service_configuration;

        let body = self.templates.fetch_template(requested).await?;
        if body.trim().is_empty() {
            return Err(CoreError::ServiceTemplateEmpty {
                service_name: requested.service_name.clone(),
            });
        }

        // Re-fetch the configuration with the enabled+migrated filter:
        // it may have been disabled between the outer lookup and now.
        let config = self
            .configurations
            .find_enabled_migrated(requested.id)
            .await?
            .ok_or(CoreError::ServiceConfigurationNotFound { id: requested.id })?;

        let file_hash = template_hash(&body);

        if let Some(published) = self
            .versions
            .find_latest_by_hash(config.id, &file_hash, TemplateVersionStatus::Published)
            .await?
        {
            tracing::debug!(
                service = %config.service_name,
                version = published.version,
                "Live template matches published version"
            );
            self.record_resolved(&config, TemplateHealth::Healthy).await?;
            return Ok(TemplateDetails {
                version: published.version,
                body,
            });
        }

        let Some(pending) = self
            .versions
            .find_latest_by_hash(config.id, &file_hash, TemplateVersionStatus::Pending)
            .await?
        else {
            tracing::error!(
                service = %config.service_name,
                file_hash = %file_hash,
                "Live template matches no registered version"
            );
            self.health
                .update_if_changed(&config, TemplateHealth::Unhealthy)
                .await?;
            return Err(CoreError::ServiceTemplateHashMismatch {
                service_id: config.id,
                file_hash,
            });
        };

        let affected = self
            .versions
            .publish_pending(pending.id, pending.version, &file_hash)
            .await?;
        if affected != 1 {
            // A concurrent publisher won, or the row was superseded.
            // Terminal here; the outer request may be retried.
            tracing::error!(
                service = %config.service_name,
                version = pending.version,
                template_version_id = %pending.id,
                rows_affected = affected,
                "Publish transition did not affect exactly one row"
            );
            self.health
                .update_if_changed(&config, TemplateHealth::Unhealthy)
                .await?;
            return Err(CoreError::ServiceTemplatePublishFailure {
                service_name: config.service_name.clone(),
                version: pending.version,
                template_version_id: pending.id,
            });
        }

        tracing::info!(
            service = %config.service_name,
            version = pending.version,
            template_version_id = %pending.id,
            "Published template version"
        );
        self.record_resolved(&config, TemplateHealth::Healthy).await?;
        Ok(TemplateDetails {
            version: pending.version,
            body,
        })
    }

    /// Success-path health bookkeeping: the row is created on the first
    /// ever resolution (existence-checked), then kept in sync.
    async fn record_resolved(
        &self,
        config: &sar_db::models::ServiceConfiguration,
        status: TemplateHealth,
    ) -> Result<(), CoreError> {
        self.health.ensure_exists(config).await?;
        self.health.update_if_changed(config, status).await
    }
}
