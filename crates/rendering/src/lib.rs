//! Template version resolution and rendering pipeline.
//!
//! This is the stateful heart of the SAR renderer. For a migrated
//! service, [`resolver::TemplateVersionResolver`] fetches the live
//! template from the downstream service, hashes it, matches the hash
//! against registered versions, and drives the PENDING→PUBLISHED
//! transition. [`selector::TemplateSelector`] chooses between that path
//! and the bundled legacy templates, and applies the "no data held"
//! fallback. [`renderer::Renderer`] performs the two-stage composition
//! (service template, then style wrapper).
//!
//! All collaborators are narrow traits ([`interfaces`]) so the pipeline
//! is testable without a database or network; production implementations
//! live in [`stores`].

pub mod health;
pub mod interfaces;
pub mod renderer;
pub mod request;
pub mod resolver;
pub mod selector;
pub mod stores;

pub use renderer::Renderer;
pub use request::{RenderParameters, RenderRequest, TemplateDetails};
pub use resolver::TemplateVersionResolver;
pub use selector::TemplateSelector;
