//! The orchestrating render service.
//!
//! Drives one (request id, service) rendering end to end: idempotency
//! probe, subject data fetch, template selection, two-stage rendering,
//! and persistence of the HTML, the raw JSON payload, and any
//! attachments to the object store.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use sar_client::{Document, DocumentStore};
use sar_core::error::CoreError;
use sar_rendering::request::RenderRequest;
use sar_rendering::{Renderer, TemplateSelector};

use crate::data_source::SubjectDataSource;

/// Reference to an attachment inside a service payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentRef {
    filename: String,
    content_type: String,
    url: String,
}

/// Result of one render operation.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutcome {
    /// Object-store key of the rendered HTML document.
    pub document_key: String,
    /// Template version used, absent when the render was skipped.
    pub template_version: Option<String>,
    /// True when the document already existed and nothing was done.
    pub already_rendered: bool,
}

/// Renders one service's report for one SAR request and persists it.
pub struct RenderService {
    selector: TemplateSelector,
    renderer: Renderer,
    data_source: Arc<dyn SubjectDataSource>,
    store: Arc<dyn DocumentStore>,
}

impl RenderService {
    pub fn new(
        selector: TemplateSelector,
        renderer: Renderer,
        data_source: Arc<dyn SubjectDataSource>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            selector,
            renderer,
            data_source,
            store,
        }
    }

    /// Render and persist, idempotent per (request id, service).
    pub async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome, CoreError> {
        let html_key = request
            .html_document_key()
            .ok_or_else(|| CoreError::Validation("render request id is required".into()))?;

        // Idempotency: an existing document means a previous attempt
        // completed; do nothing.
        let existing = self
            .store
            .list_by_prefix(&html_key)
            .await
            .map_err(store_error)?;
        if !existing.is_empty() {
            tracing::info!(document_key = %html_key, "Document already rendered, skipping");
            return Ok(RenderOutcome {
                document_key: html_key,
                template_version: None,
                already_rendered: true,
            });
        }

        let data = self.data_source.fetch_data(request).await?;
        let attachments = extract_attachments(data.as_ref())?;

        let parameters = self
            .selector
            .get_render_parameters(request, data.clone())
            .await?;
        let html = self.renderer.render(&parameters)?;

        // Nothing is persisted until rendering has fully succeeded, and
        // the HTML key is written last: it doubles as the completion
        // marker the idempotency probe keys off, so a failure partway
        // through leaves the pair eligible for a clean re-render.
        if let Some(json_key) = request.json_document_key() {
            let payload = data.unwrap_or(Value::Null);
            let bytes = serde_json::to_vec(&payload)
                .map_err(|err| CoreError::Internal(format!("payload serialization: {err}")))?;
            self.store
                .put(
                    &json_key,
                    Document {
                        bytes,
                        content_type: "application/json".into(),
                    },
                )
                .await
                .map_err(store_error)?;
        }

        for (n, attachment) in attachments.iter().enumerate() {
            let bytes = self.data_source.fetch_attachment(&attachment.url).await?;
            let key = request
                .attachment_key(n + 1, &attachment.filename)
                .ok_or_else(|| CoreError::Validation("render request id is required".into()))?;
            self.store
                .put(
                    &key,
                    Document {
                        bytes,
                        content_type: attachment.content_type.clone(),
                    },
                )
                .await
                .map_err(store_error)?;
        }

        self.store
            .put(
                &html_key,
                Document {
                    bytes: html,
                    content_type: "text/html".into(),
                },
            )
            .await
            .map_err(store_error)?;

        tracing::info!(
            document_key = %html_key,
            template_version = %parameters.template_version,
            attachments = attachments.len(),
            "Rendered and persisted report"
        );
        Ok(RenderOutcome {
            document_key: html_key,
            template_version: Some(parameters.template_version),
            already_rendered: false,
        })
    }
}

fn store_error(err: sar_client::StoreError) -> CoreError {
    CoreError::Internal(format!("document store: {err}"))
}

/// Pull attachment references out of a payload's `attachments` array.
fn extract_attachments(data: Option<&Value>) -> Result<Vec<AttachmentRef>, CoreError> {
    let Some(list) = data.and_then(|d| d.get("attachments")) else {
        return Ok(Vec::new());
    };
    serde_json::from_value(list.clone())
        .map_err(|err| CoreError::Validation(format!("malformed attachments list: {err}")))
}
