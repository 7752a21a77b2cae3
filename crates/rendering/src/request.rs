//! Per-render value objects.

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use sar_client::SubjectDataQuery;
use sar_db::models::ServiceConfiguration;

/// One rendering operation: who the subject is, which service to
/// report on, and what range to cover. Constructed per request, passed
/// by value through the pipeline, never persisted.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// SAR request id; absent only on dev/test paths, and required
    /// before anything is persisted.
    pub id: Option<Uuid>,
    /// Prison subject identifier (NOMIS number).
    pub nomis_id: Option<String>,
    /// Probation subject identifier (nDelius CRN).
    pub ndelius_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sar_case_reference_number: Option<String>,
    pub service_configuration: ServiceConfiguration,
}

impl RenderRequest {
    /// Key of the rendered HTML document: `{id}/{serviceName}.html`.
    pub fn html_document_key(&self) -> Option<String> {
        self.id
            .map(|id| format!("{id}/{}.html", self.service_configuration.service_name))
    }

    /// Key of the raw JSON payload: `{id}/{serviceName}.json`.
    pub fn json_document_key(&self) -> Option<String> {
        self.id
            .map(|id| format!("{id}/{}.json", self.service_configuration.service_name))
    }

    /// Key of the nth attachment:
    /// `{id}/{serviceName}/attachments/{n}-{filename}`.
    pub fn attachment_key(&self, n: usize, filename: &str) -> Option<String> {
        self.id.map(|id| {
            format!(
                "{id}/{}/attachments/{n}-{filename}",
                self.service_configuration.service_name
            )
        })
    }

    /// Downstream query parameters for this subject and range.
    pub fn subject_data_query(&self) -> SubjectDataQuery {
        SubjectDataQuery {
            prn: self.nomis_id.clone(),
            crn: self.ndelius_id.clone(),
            from_date: self.date_from.map(|d| d.format("%Y-%m-%d").to_string()),
            to_date: self.date_to.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// A resolved template for a migrated service: the registered version
/// number and the live body it was verified against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDetails {
    pub version: i32,
    pub body: String,
}

/// Output of template selection, consumed immediately by the renderer.
#[derive(Debug, Clone)]
pub struct RenderParameters {
    /// `"legacy"` or the resolved version number as a string.
    pub template_version: String,
    /// Template body to render.
    pub template: String,
    /// Value to bind against (the service payload, or the no-data map).
    pub data: Value,
}
