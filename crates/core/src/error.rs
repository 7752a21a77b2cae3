use serde_json::{json, Value};
use uuid::Uuid;

/// Domain-level errors raised by the template resolution and rendering
/// pipeline.
///
/// Every variant carries the identifiers a caller needs for diagnostics;
/// [`CoreError::code`] and [`CoreError::params`] expose them as a stable
/// error code plus a structured parameter map for logging and telemetry
/// at the request-handler boundary. None of these are recovered from
/// inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The downstream service returned an empty or all-whitespace
    /// template body.
    #[error("Service {service_name} returned an empty template")]
    ServiceTemplateEmpty { service_name: String },

    /// The service configuration vanished or was disabled between the
    /// outer lookup and resolution.
    #[error("Service configuration {id} not found (enabled, migrated)")]
    ServiceConfigurationNotFound { id: Uuid },

    /// The live template's hash matches no registered PUBLISHED or
    /// PENDING version for the service.
    #[error("Template hash {file_hash} matches no registered version for service {service_id}")]
    ServiceTemplateHashMismatch { service_id: Uuid, file_hash: String },

    /// The conditional PENDING→PUBLISHED update did not affect exactly
    /// one row. A concurrent publisher won the race or the row was
    /// superseded; the request fails and may be retried at the outer
    /// level.
    #[error("Failed to publish template version {version} ({template_version_id}) for service {service_name}")]
    ServiceTemplatePublishFailure {
        service_name: String,
        version: i32,
        template_version_id: Uuid,
    },

    /// A bundled legacy template resource is missing.
    #[error("Template resource not found: {path}")]
    TemplateResourceNotFound { path: String },

    /// Template rendering failed (malformed template or bind error).
    #[error("Template rendering failed: {0}")]
    TemplateRender(String),

    /// Validation failed on an incoming value.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ServiceTemplateEmpty { .. } => "SERVICE_TEMPLATE_EMPTY",
            CoreError::ServiceConfigurationNotFound { .. } => "SERVICE_CONFIGURATION_NOT_FOUND",
            CoreError::ServiceTemplateHashMismatch { .. } => "SERVICE_TEMPLATE_HASH_MISMATCH",
            CoreError::ServiceTemplatePublishFailure { .. } => "SERVICE_TEMPLATE_PUBLISH_FAILURE",
            CoreError::TemplateResourceNotFound { .. } => "TEMPLATE_RESOURCE_NOT_FOUND",
            CoreError::TemplateRender(_) => "TEMPLATE_RENDER_FAILURE",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Structured diagnostic parameters for the request handler to log.
    pub fn params(&self) -> Value {
        match self {
            CoreError::ServiceTemplateEmpty { service_name } => {
                json!({ "serviceName": service_name })
            }
            CoreError::ServiceConfigurationNotFound { id } => {
                json!({ "serviceConfigurationId": id })
            }
            CoreError::ServiceTemplateHashMismatch {
                service_id,
                file_hash,
            } => json!({ "serviceConfigurationId": service_id, "fileHash": file_hash }),
            CoreError::ServiceTemplatePublishFailure {
                service_name,
                version,
                template_version_id,
            } => json!({
                "serviceName": service_name,
                "version": version,
                "templateVersionId": template_version_id,
            }),
            CoreError::TemplateResourceNotFound { path } => json!({ "path": path }),
            CoreError::TemplateRender(msg)
            | CoreError::Validation(msg)
            | CoreError::Internal(msg) => json!({ "message": msg }),
        }
    }
}
