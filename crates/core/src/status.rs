//! Template version and health status enums.
//!
//! Both are stored as TEXT in the database; `as_str` returns the exact
//! stored value and is what repositories bind into queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a template version row.
///
/// `Pending` versions are staged but not yet confirmed live; `Published`
/// versions have been observed being served by the downstream service.
/// The pipeline only ever transitions `Pending` → `Published`, and only
/// via a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateVersionStatus {
    Pending,
    Published,
}

impl TemplateVersionStatus {
    /// Database value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateVersionStatus::Pending => "PENDING",
            TemplateVersionStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for TemplateVersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-service template health signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateHealth {
    Healthy,
    Unhealthy,
}

impl TemplateHealth {
    /// Database value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateHealth::Healthy => "HEALTHY",
            TemplateHealth::Unhealthy => "UNHEALTHY",
        }
    }
}

impl fmt::Display for TemplateHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
