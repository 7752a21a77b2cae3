//! Object-store seam for rendered documents.
//!
//! The pipeline treats the store as a key-value blob store with
//! list-by-prefix; [`DocumentStore`] is that shape and nothing more.
//! Production uses [`S3DocumentStore`]; tests use
//! [`MemoryDocumentStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Errors from document-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Object store operation failed: {0}")]
    Backend(String),
}

/// A stored document's content and media type.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Key-value blob store with list-by-prefix.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a document under `key`, overwriting any existing object.
    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError>;

    /// Fetch a document's bytes, or `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// List keys beginning with `prefix`.
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// S3 implementation
// ---------------------------------------------------------------------------

/// S3-backed document store.
#[derive(Debug, Clone)]
pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from ambient AWS configuration (env, profile, IAM).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket)
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(&document.content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(document.bytes))
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        match result {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|err| StoreError::Backend(err.to_string()))?;
                Ok(Some(data.into_bytes().to_vec()))
            }
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if not_found {
                    Ok(None)
                } else {
                    Err(StoreError::Backend(err.to_string()))
                }
            }
        }
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory document store used by tests and local development.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    objects: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .objects
            .read()
            .await
            .get(key)
            .map(|document| document.bytes.clone()))
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
