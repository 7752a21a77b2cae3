//! Row models for the SAR renderer tables.

pub mod service_configuration;
pub mod template_version;
pub mod template_version_health;

pub use service_configuration::ServiceConfiguration;
pub use template_version::TemplateVersion;
pub use template_version_health::TemplateVersionHealthStatus;
