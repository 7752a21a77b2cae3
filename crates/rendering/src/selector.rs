//! Template selection: migrated versus legacy, and the no-data fallback.

use std::sync::Arc;

use serde_json::{json, Value};

use sar_core::error::CoreError;
use sar_core::types::LEGACY_TEMPLATE_VERSION;

use crate::health::TemplateVersionHealthTracker;
use crate::interfaces::StaticTemplateSource;
use crate::request::{RenderParameters, RenderRequest};
use crate::resolver::TemplateVersionResolver;

/// Rendered when a service holds no data for the subject. Bound against
/// `{serviceLabel}` only.
const NO_DATA_HELD_TEMPLATE: &str = include_str!("../templates/no_data_held.mustache");

/// Decides the rendering inputs for a request.
///
/// Migrated services go through the version resolver; everything else
/// loads the bundled `template_{serviceName}.mustache`. The no-data
/// fallback is applied after resolution, so a migrated service keeps
/// its resolved version tag even when the fallback body is rendered.
pub struct TemplateSelector {
    resolver: Arc<TemplateVersionResolver>,
    statics: Arc<dyn StaticTemplateSource>,
    health: Arc<TemplateVersionHealthTracker>,
}

impl TemplateSelector {
    pub fn new(
        resolver: Arc<TemplateVersionResolver>,
        statics: Arc<dyn StaticTemplateSource>,
        health: Arc<TemplateVersionHealthTracker>,
    ) -> Self {
        Self {
            resolver,
            statics,
            health,
        }
    }

    /// Build the final render parameters for one request.
    pub async fn get_render_parameters(
        &self,
        request: &RenderRequest,
        data: Option<Value>,
    ) -> Result<RenderParameters, CoreError> {
        let config = &request.service_configuration;

        let (template_version, template) = if config.template_migrated {
            self.health.ensure_exists(config).await?;
            let details = self.resolver.resolve(request).await?;
            (details.version.to_string(), details.body)
        } else {
            let body = self.statics.load(&config.service_name).ok_or_else(|| {
                CoreError::TemplateResourceNotFound {
                    path: self.statics.resource_path(&config.service_name),
                }
            })?;
            (LEGACY_TEMPLATE_VERSION.to_string(), body)
        };

        let parameters = match data {
            Some(data) => RenderParameters {
                template_version,
                template,
                data,
            },
            // No data held: swap body and bind data, keep the version
            // tag from resolution above.
            None => RenderParameters {
                template_version,
                template: NO_DATA_HELD_TEMPLATE.to_string(),
                data: json!({ "serviceLabel": config.label }),
            },
        };
        Ok(parameters)
    }
}
