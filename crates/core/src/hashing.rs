//! SHA-256 hex digest of template bodies.
//!
//! The digest is the comparison key between what a downstream service
//! currently serves and the versions registered in the database, so it
//! must be computed over the exact bytes received, with no
//! normalisation.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of a template body.
pub fn template_hash(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}
