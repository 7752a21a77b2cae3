//! Domain types shared across the SAR renderer workspace.
//!
//! Holds the error taxonomy, template status enums, and the SHA-256
//! digest helper used for template integrity checks. Contains no I/O.

pub mod error;
pub mod hashing;
pub mod status;
pub mod types;
