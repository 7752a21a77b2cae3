//! Repositories for the SAR renderer tables.

pub mod service_configuration_repo;
pub mod template_version_health_repo;
pub mod template_version_repo;

pub use service_configuration_repo::ServiceConfigurationRepo;
pub use template_version_health_repo::TemplateVersionHealthRepo;
pub use template_version_repo::TemplateVersionRepo;
