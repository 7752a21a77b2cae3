//! Collaborator interfaces required by the pipeline.
//!
//! Each trait is the narrowest shape the pipeline needs from its
//! surroundings. Production implementations (database, HTTP, bundled
//! files) live in [`crate::stores`]; tests substitute in-memory fakes.

use async_trait::async_trait;

use sar_core::error::CoreError;
use sar_core::status::{TemplateHealth, TemplateVersionStatus};
use sar_db::models::{ServiceConfiguration, TemplateVersion, TemplateVersionHealthStatus};
use uuid::Uuid;

/// Fetches the template a downstream service currently serves.
///
/// Retry policy belongs to the implementation, never to the resolver;
/// whatever body comes back is treated as authoritative text.
#[async_trait]
pub trait LiveTemplateSource: Send + Sync {
    async fn fetch_template(&self, config: &ServiceConfiguration) -> Result<String, CoreError>;
}

/// Queries and the publish transition over registered template versions.
#[async_trait]
pub trait TemplateVersionStore: Send + Sync {
    /// Latest version for (service, hash) in the given status.
    async fn find_latest_by_hash(
        &self,
        service_configuration_id: Uuid,
        file_hash: &str,
        status: TemplateVersionStatus,
    ) -> Result<Option<TemplateVersion>, CoreError>;

    /// Conditional PENDING→PUBLISHED transition pinned to
    /// (id, version, hash, status). Returns rows affected.
    async fn publish_pending(
        &self,
        id: Uuid,
        version: i32,
        file_hash: &str,
    ) -> Result<u64, CoreError>;
}

/// Authoritative service-configuration lookups.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Find a configuration that is currently enabled and migrated.
    async fn find_enabled_migrated(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceConfiguration>, CoreError>;
}

/// Per-service health-row persistence.
///
/// Both mutations are store-level conditional operations: the insert is
/// unique-constraint guarded, the update writes only on change.
#[async_trait]
pub trait HealthStatusStore: Send + Sync {
    async fn find_by_service(
        &self,
        service_configuration_id: Uuid,
    ) -> Result<Option<TemplateVersionHealthStatus>, CoreError>;

    /// Insert a HEALTHY row unless one exists; conflict is benign.
    async fn insert_healthy(&self, service_configuration_id: Uuid) -> Result<u64, CoreError>;

    /// Write the status only if it differs from the stored one.
    async fn update_if_changed(
        &self,
        service_configuration_id: Uuid,
        status: TemplateHealth,
    ) -> Result<u64, CoreError>;
}

/// Loads bundled legacy templates by service name.
pub trait StaticTemplateSource: Send + Sync {
    /// Body of `template_{service_name}.mustache`, if bundled.
    fn load(&self, service_name: &str) -> Option<String>;

    /// Resource path used in diagnostics for a missing template.
    fn resource_path(&self, service_name: &str) -> String {
        format!("template_{service_name}.mustache")
    }
}

/// Entity cross-reference lookups available to template helpers.
///
/// Implementations resolve opaque identifiers in service payloads to
/// display names. Lookups are best-effort: `None` renders as a dash.
pub trait DataFetcher: Send + Sync {
    /// Display name for an internal location id.
    fn location_name(&self, id: &str) -> Option<String>;

    /// Display name for a prison establishment code.
    fn prison_name(&self, id: &str) -> Option<String>;

    /// Full name for a staff username.
    fn user_full_name(&self, username: &str) -> Option<String>;
}

/// A [`DataFetcher`] that resolves nothing; identifiers render as-is
/// handled by the helpers' fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookupDataFetcher;

impl DataFetcher for NoLookupDataFetcher {
    fn location_name(&self, _id: &str) -> Option<String> {
        None
    }

    fn prison_name(&self, _id: &str) -> Option<String> {
        None
    }

    fn user_full_name(&self, _username: &str) -> Option<String> {
        None
    }
}
