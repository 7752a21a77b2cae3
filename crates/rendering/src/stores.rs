//! Production implementations of the collaborator interfaces.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sar_client::DownstreamClient;
use sar_core::error::CoreError;
use sar_core::status::{TemplateHealth, TemplateVersionStatus};
use sar_db::models::{ServiceConfiguration, TemplateVersion, TemplateVersionHealthStatus};
use sar_db::repositories::{
    ServiceConfigurationRepo, TemplateVersionHealthRepo, TemplateVersionRepo,
};

use crate::interfaces::{
    ConfigurationStore, HealthStatusStore, LiveTemplateSource, StaticTemplateSource,
    TemplateVersionStore,
};

fn db_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {err}"))
}

/// Postgres-backed implementation of the store interfaces, a thin
/// adapter over the `sar-db` repositories.
#[derive(Debug, Clone)]
pub struct PgStores {
    pool: PgPool,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateVersionStore for PgStores {
    async fn find_latest_by_hash(
        &self,
        service_configuration_id: Uuid,
        file_hash: &str,
        status: TemplateVersionStatus,
    ) -> Result<Option<TemplateVersion>, CoreError> {
        TemplateVersionRepo::find_latest_by_hash(
            &self.pool,
            service_configuration_id,
            file_hash,
            status,
        )
        .await
        .map_err(db_error)
    }

    async fn publish_pending(
        &self,
        id: Uuid,
        version: i32,
        file_hash: &str,
    ) -> Result<u64, CoreError> {
        TemplateVersionRepo::publish_pending(&self.pool, id, version, file_hash)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl ConfigurationStore for PgStores {
    async fn find_enabled_migrated(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceConfiguration>, CoreError> {
        ServiceConfigurationRepo::find_enabled_migrated(&self.pool, id)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl HealthStatusStore for PgStores {
    async fn find_by_service(
        &self,
        service_configuration_id: Uuid,
    ) -> Result<Option<TemplateVersionHealthStatus>, CoreError> {
        TemplateVersionHealthRepo::find_by_service(&self.pool, service_configuration_id)
            .await
            .map_err(db_error)
    }

    async fn insert_healthy(&self, service_configuration_id: Uuid) -> Result<u64, CoreError> {
        TemplateVersionHealthRepo::insert_healthy(&self.pool, service_configuration_id)
            .await
            .map_err(db_error)
    }

    async fn update_if_changed(
        &self,
        service_configuration_id: Uuid,
        status: TemplateHealth,
    ) -> Result<u64, CoreError> {
        TemplateVersionHealthRepo::update_if_changed(
            &self.pool,
            service_configuration_id,
            status,
        )
        .await
        .map_err(db_error)
    }
}

/// Live template fetch over the retrying downstream client.
#[derive(Debug, Clone)]
pub struct HttpLiveTemplateSource {
    client: DownstreamClient,
}

impl HttpLiveTemplateSource {
    pub fn new(client: DownstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LiveTemplateSource for HttpLiveTemplateSource {
    async fn fetch_template(&self, config: &ServiceConfiguration) -> Result<String, CoreError> {
        let response = self
            .client
            .fetch_template(&config.url)
            .await
            .map_err(|err| {
                CoreError::Internal(format!(
                    "template fetch from {} failed: {err}",
                    config.service_name
                ))
            })?;
        if response.status != 200 {
            return Err(CoreError::Internal(format!(
                "template fetch from {} returned status {}",
                config.service_name, response.status
            )));
        }
        Ok(response.body)
    }
}

/// Legacy templates loaded from a directory of bundled
/// `template_{serviceName}.mustache` files.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    dir: PathBuf,
}

impl FileTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StaticTemplateSource for FileTemplateSource {
    fn load(&self, service_name: &str) -> Option<String> {
        let path = self.dir.join(format!("template_{service_name}.mustache"));
        std::fs::read_to_string(path).ok()
    }
}
