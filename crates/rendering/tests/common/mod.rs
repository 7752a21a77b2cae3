//! In-memory fakes of the pipeline's collaborator interfaces.
//!
//! The fakes mirror the store-level semantics the production SQL
//! provides: the publish transition is a compare-and-swap under one
//! lock, the health insert is create-if-absent, and the health update
//! writes only on change. Call counters let tests assert which
//! collaborators were (not) touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sar_core::error::CoreError;
use sar_core::status::{TemplateHealth, TemplateVersionStatus};
use sar_db::models::{ServiceConfiguration, TemplateVersion, TemplateVersionHealthStatus};
use sar_rendering::interfaces::{
    ConfigurationStore, HealthStatusStore, LiveTemplateSource, StaticTemplateSource,
    TemplateVersionStore,
};
use sar_rendering::request::RenderRequest;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn service_config(migrated: bool) -> ServiceConfiguration {
    ServiceConfiguration {
        id: Uuid::new_v4(),
        service_name: "court-case-service".into(),
        label: "Court Cases".into(),
        url: "https://court-case-service.example".into(),
        list_order: 1,
        enabled: true,
        template_migrated: migrated,
        category: "PRISON".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn render_request(config: &ServiceConfiguration) -> RenderRequest {
    RenderRequest {
        id: Some(Uuid::new_v4()),
        nomis_id: Some("A1234BC".into()),
        ndelius_id: None,
        date_from: None,
        date_to: None,
        sar_case_reference_number: Some("SAR-042".into()),
        service_configuration: config.clone(),
    }
}

pub fn version_row(
    service_id: Uuid,
    version: i32,
    status: TemplateVersionStatus,
    file_hash: &str,
) -> TemplateVersion {
    TemplateVersion {
        id: Uuid::new_v4(),
        service_configuration_id: service_id,
        version,
        status: status.as_str().into(),
        file_hash: file_hash.into(),
        created_at: Utc::now(),
        published_at: matches!(status, TemplateVersionStatus::Published).then(Utc::now),
    }
}

// ---------------------------------------------------------------------------
// Live template source
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeLiveTemplates {
    body: Mutex<String>,
}

impl FakeLiveTemplates {
    pub fn serving(body: &str) -> Self {
        Self {
            body: Mutex::new(body.to_string()),
        }
    }

    /// Change what the fake downstream service serves.
    pub fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = body.to_string();
    }
}

#[async_trait]
impl LiveTemplateSource for FakeLiveTemplates {
    async fn fetch_template(&self, _config: &ServiceConfiguration) -> Result<String, CoreError> {
        Ok(self.body.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Template version store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeVersions {
    pub rows: Mutex<Vec<TemplateVersion>>,
    pub find_calls: AtomicUsize,
    pub publish_calls: AtomicUsize,
}

impl FakeVersions {
    pub fn with_rows(rows: Vec<TemplateVersion>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn row_by_id(&self, id: Uuid) -> Option<TemplateVersion> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

#[async_trait]
impl TemplateVersionStore for FakeVersions {
    async fn find_latest_by_hash(
        &self,
        service_configuration_id: Uuid,
        file_hash: &str,
        status: TemplateVersionStatus,
    ) -> Result<Option<TemplateVersion>, CoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| {
                row.service_configuration_id == service_configuration_id
                    && row.file_hash == file_hash
                    && row.status == status.as_str()
            })
            .max_by_key(|row| row.version)
            .cloned())
    }

    async fn publish_pending(
        &self,
        id: Uuid,
        version: i32,
        file_hash: &str,
    ) -> Result<u64, CoreError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        // Single critical section, like the single UPDATE statement.
        let mut rows = self.rows.lock().unwrap();
        let matched = rows.iter_mut().find(|row| {
            row.id == id
                && row.version == version
                && row.file_hash == file_hash
                && row.status == TemplateVersionStatus::Pending.as_str()
        });
        match matched {
            Some(row) => {
                row.status = TemplateVersionStatus::Published.as_str().into();
                row.published_at = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeConfigurations {
    configs: Mutex<HashMap<Uuid, ServiceConfiguration>>,
}

impl FakeConfigurations {
    pub fn with(config: &ServiceConfiguration) -> Self {
        let fake = Self::default();
        fake.upsert(config.clone());
        fake
    }

    pub fn upsert(&self, config: ServiceConfiguration) {
        self.configs.lock().unwrap().insert(config.id, config);
    }

    pub fn remove(&self, id: Uuid) {
        self.configs.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl ConfigurationStore for FakeConfigurations {
    async fn find_enabled_migrated(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceConfiguration>, CoreError> {
        Ok(self
            .configs
            .lock()
            .unwrap()
            .get(&id)
            .filter(|c| c.enabled && c.template_migrated)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Health store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeHealth {
    rows: Mutex<HashMap<Uuid, TemplateVersionHealthStatus>>,
    pub insert_calls: AtomicUsize,
    pub update_writes: AtomicUsize,
}

impl FakeHealth {
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn status_of(&self, service_id: Uuid) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .get(&service_id)
            .map(|row| row.status.clone())
    }

    pub fn seed(&self, service_id: Uuid, status: TemplateHealth) {
        self.rows.lock().unwrap().insert(
            service_id,
            TemplateVersionHealthStatus {
                id: Uuid::new_v4(),
                service_configuration_id: service_id,
                status: status.as_str().into(),
                last_modified: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl HealthStatusStore for FakeHealth {
    async fn find_by_service(
        &self,
        service_configuration_id: Uuid,
    ) -> Result<Option<TemplateVersionHealthStatus>, CoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&service_configuration_id)
            .cloned())
    }

    async fn insert_healthy(&self, service_configuration_id: Uuid) -> Result<u64, CoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        // Unique-constraint semantics: the loser affects zero rows.
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&service_configuration_id) {
            return Ok(0);
        }
        rows.insert(
            service_configuration_id,
            TemplateVersionHealthStatus {
                id: Uuid::new_v4(),
                service_configuration_id,
                status: TemplateHealth::Healthy.as_str().into(),
                last_modified: Utc::now(),
            },
        );
        Ok(1)
    }

    async fn update_if_changed(
        &self,
        service_configuration_id: Uuid,
        status: TemplateHealth,
    ) -> Result<u64, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&service_configuration_id) {
            Some(row) if row.status != status.as_str() => {
                row.status = status.as_str().into();
                row.last_modified = Utc::now();
                self.update_writes.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Static template source
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStaticTemplates {
    templates: HashMap<String, String>,
}

impl FakeStaticTemplates {
    pub fn with(service_name: &str, body: &str) -> Self {
        let mut templates = HashMap::new();
        templates.insert(service_name.to_string(), body.to_string());
        Self { templates }
    }
}

impl StaticTemplateSource for FakeStaticTemplates {
    fn load(&self, service_name: &str) -> Option<String> {
        self.templates.get(service_name).cloned()
    }
}
