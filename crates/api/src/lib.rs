//! SAR renderer API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! the orchestrating render service) so integration tests and the
//! binary entrypoint can both use them.

pub mod config;
pub mod data_source;
pub mod error;
pub mod render_service;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
