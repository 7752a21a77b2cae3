//! Two-stage template composition.
//!
//! Stage one renders the service template against the bound data.
//! Stage two wraps the resulting HTML fragment in the style template,
//! bound as the single `serviceTemplate` placeholder. Both stages are
//! pure string functions so each template family is testable in
//! isolation.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::{json, Value};

use sar_core::error::CoreError;

use crate::interfaces::DataFetcher;
use crate::request::RenderParameters;

/// Outer layout and stylesheet for every rendered report.
const STYLE_TEMPLATE: &str = include_str!("../templates/style.mustache");

/// Placeholder rendered for absent or empty values.
const MISSING_VALUE: &str = "-";

/// Renders service templates and wraps them in the report layout.
///
/// Helpers available to service templates:
/// - `{{optionalValue x}}` — `x`, or a dash when absent/empty
/// - `{{locationName id}}` — display name for an internal location id
/// - `{{prisonName code}}` — establishment name for a prison code
/// - `{{userName username}}` — staff member's full name
///
/// The lookup helpers go through the injected [`DataFetcher`] and fall
/// back to the raw identifier when no name is known.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new(fetcher: Arc<dyn DataFetcher>) -> Self {
        let mut registry = Handlebars::new();
        registry.register_helper("optionalValue", Box::new(optional_value_helper));
        registry.register_helper(
            "locationName",
            Box::new(LookupHelper::new(Arc::clone(&fetcher), Lookup::Location)),
        );
        registry.register_helper(
            "prisonName",
            Box::new(LookupHelper::new(Arc::clone(&fetcher), Lookup::Prison)),
        );
        registry.register_helper(
            "userName",
            Box::new(LookupHelper::new(fetcher, Lookup::User)),
        );
        Self { registry }
    }

    /// Stage one: render the service template against the data model.
    pub fn render_service_template(
        &self,
        template: &str,
        data: &Value,
    ) -> Result<String, CoreError> {
        self.registry
            .render_template(template, data)
            .map_err(|err| CoreError::TemplateRender(err.to_string()))
    }

    /// Stage two: wrap an HTML fragment in the style template.
    pub fn render_styled(&self, fragment: &str) -> Result<String, CoreError> {
        self.registry
            .render_template(STYLE_TEMPLATE, &json!({ "serviceTemplate": fragment }))
            .map_err(|err| CoreError::TemplateRender(err.to_string()))
    }

    /// Full composition: service template, then style wrapper.
    pub fn render(&self, parameters: &RenderParameters) -> Result<Vec<u8>, CoreError> {
        let fragment = self.render_service_template(&parameters.template, &parameters.data)?;
        Ok(self.render_styled(&fragment)?.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn optional_value_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
    match value {
        Value::Null => out.write(MISSING_VALUE)?,
        Value::String(s) if s.trim().is_empty() => out.write(MISSING_VALUE)?,
        Value::String(s) => out.write(s)?,
        other => out.write(&other.to_string())?,
    }
    Ok(())
}

/// Which cross-reference a [`LookupHelper`] performs.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    Location,
    Prison,
    User,
}

/// Handlebars helper resolving an identifier through the data-fetch
/// facade, writing the raw identifier when no name is known.
struct LookupHelper {
    fetcher: Arc<dyn DataFetcher>,
    lookup: Lookup,
}

impl LookupHelper {
    fn new(fetcher: Arc<dyn DataFetcher>, lookup: Lookup) -> Self {
        Self { fetcher, lookup }
    }
}

impl HelperDef for LookupHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let id = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("lookup helper", 0))?;
        let name = match self.lookup {
            Lookup::Location => self.fetcher.location_name(id),
            Lookup::Prison => self.fetcher.prison_name(id),
            Lookup::User => self.fetcher.user_full_name(id),
        };
        out.write(name.as_deref().unwrap_or(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::NoLookupDataFetcher;

    struct CannedFetcher;

    impl DataFetcher for CannedFetcher {
        fn location_name(&self, id: &str) -> Option<String> {
            (id == "LOC-1").then(|| "B Wing".to_string())
        }

        fn prison_name(&self, id: &str) -> Option<String> {
            (id == "MDI").then(|| "Moorland (HMP & YOI)".to_string())
        }

        fn user_full_name(&self, username: &str) -> Option<String> {
            (username == "JSMITH_GEN").then(|| "John Smith".to_string())
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Arc::new(CannedFetcher))
    }

    #[test]
    fn service_template_binds_nested_data() {
        let fragment = renderer()
            .render_service_template(
                "<h2>{{label}}</h2><ul>{{#each visits}}<li>{{this.date}}</li>{{/each}}</ul>",
                &json!({ "label": "Visits", "visits": [{ "date": "2024-01-02" }] }),
            )
            .unwrap();
        assert_eq!(fragment, "<h2>Visits</h2><ul><li>2024-01-02</li></ul>");
    }

    #[test]
    fn styled_output_embeds_fragment_unescaped() {
        let html = renderer().render_styled("<p>&amp; fragment</p>").unwrap();
        assert!(html.contains("<p>&amp; fragment</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn optional_value_renders_dash_for_missing() {
        let r = renderer();
        assert_eq!(
            r.render_service_template("{{optionalValue note}}", &json!({}))
                .unwrap(),
            "-"
        );
        assert_eq!(
            r.render_service_template("{{optionalValue note}}", &json!({ "note": "  " }))
                .unwrap(),
            "-"
        );
        assert_eq!(
            r.render_service_template("{{optionalValue note}}", &json!({ "note": "kept" }))
                .unwrap(),
            "kept"
        );
    }

    #[test]
    fn lookup_helpers_resolve_through_fetcher() {
        let r = renderer();
        let fragment = r
            .render_service_template(
                "{{locationName loc}} / {{prisonName prison}} / {{userName staff}}",
                &json!({ "loc": "LOC-1", "prison": "MDI", "staff": "JSMITH_GEN" }),
            )
            .unwrap();
        // Helper output is written directly, not HTML-escaped.
        assert_eq!(fragment, "B Wing / Moorland (HMP & YOI) / John Smith");
    }

    #[test]
    fn lookup_falls_back_to_raw_identifier() {
        let r = Renderer::new(Arc::new(NoLookupDataFetcher));
        assert_eq!(
            r.render_service_template("{{locationName loc}}", &json!({ "loc": "LOC-9" }))
                .unwrap(),
            "LOC-9"
        );
    }

    #[test]
    fn malformed_template_is_a_render_failure() {
        let err = renderer()
            .render_service_template("{{#each rows}}no close", &json!({ "rows": [] }))
            .unwrap_err();
        assert_eq!(err.code(), "TEMPLATE_RENDER_FAILURE");
    }

    #[test]
    fn full_composition_produces_html_bytes() {
        let parameters = RenderParameters {
            template_version: "3".into(),
            template: "<h2>{{serviceLabel}}</h2>".into(),
            data: json!({ "serviceLabel": "Keyworker" }),
        };
        let bytes = renderer().render(&parameters).unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("<h2>Keyworker</h2>"));
        assert!(html.contains("</html>"));
    }
}
