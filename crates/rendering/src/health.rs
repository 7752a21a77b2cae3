//! Per-service template health tracking.

use std::sync::Arc;

use sar_core::error::CoreError;
use sar_core::status::TemplateHealth;
use sar_db::models::ServiceConfiguration;

use crate::interfaces::{ConfigurationStore, HealthStatusStore};

/// Maintains one health row per migrated service.
///
/// Creation is lazy and race-safe: the existence probe keeps the common
/// path write-free, and the insert itself is unique-constraint guarded,
/// so a concurrent first-resolution losing the race affects zero rows
/// and is not an error. Runs on its own transaction boundary, decoupled
/// from the render path.
pub struct TemplateVersionHealthTracker {
    configurations: Arc<dyn ConfigurationStore>,
    store: Arc<dyn HealthStatusStore>,
}

impl TemplateVersionHealthTracker {
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        store: Arc<dyn HealthStatusStore>,
    ) -> Self {
        Self {
            configurations,
            store,
        }
    }

    /// Create the health row for a service if it does not exist yet.
    ///
    /// No-op unless the service is currently enabled and migrated; the
    /// caller's copy of the configuration is not trusted for that.
    pub async fn ensure_exists(&self, config: &ServiceConfiguration) -> Result<(), CoreError> {
        let Some(current) = self.configurations.find_enabled_migrated(config.id).await? else {
            return Ok(());
        };

        if self.store.find_by_service(current.id).await?.is_some() {
            return Ok(());
        }

        let inserted = self.store.insert_healthy(current.id).await?;
        if inserted == 1 {
            tracing::info!(
                service = %current.service_name,
                service_configuration_id = %current.id,
                "Created template health row"
            );
        }
        Ok(())
    }

    /// Record a new health status, writing only when it differs from
    /// the stored one.
    pub async fn update_if_changed(
        &self,
        config: &ServiceConfiguration,
        status: TemplateHealth,
    ) -> Result<(), CoreError> {
        let changed = self.store.update_if_changed(config.id, status).await?;
        if changed == 1 {
            tracing::warn!(
                service = %config.service_name,
                service_configuration_id = %config.id,
                status = %status,
                "Template health status changed"
            );
        }
        Ok(())
    }
}
