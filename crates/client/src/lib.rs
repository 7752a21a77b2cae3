//! Outbound I/O for the SAR renderer.
//!
//! [`downstream`] talks to the services whose data is being reported on
//! (templates, subject data, attachments) and owns the retry policy —
//! the rendering pipeline never retries on its own. [`store`] is the
//! object-store seam: a narrow trait with an S3 implementation and an
//! in-memory implementation for tests.

pub mod downstream;
pub mod store;

pub use downstream::{ClientError, DownstreamClient, SubjectDataQuery, TemplateResponse};
pub use store::{Document, DocumentStore, MemoryDocumentStore, S3DocumentStore, StoreError};
