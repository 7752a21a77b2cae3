//! Subject-data fetch seam for the orchestrator.
//!
//! The render service needs two things from the outside world beyond
//! template resolution: the subject's data payload and attachment
//! bytes. [`SubjectDataSource`] is that shape; production goes through
//! the retrying [`DownstreamClient`].

use async_trait::async_trait;
use serde_json::Value;

use sar_client::DownstreamClient;
use sar_core::error::CoreError;
use sar_rendering::request::RenderRequest;

/// Fetches subject data and attachments for a render request.
#[async_trait]
pub trait SubjectDataSource: Send + Sync {
    /// The subject's payload from the request's service, or `None` when
    /// the service holds no data.
    async fn fetch_data(&self, request: &RenderRequest) -> Result<Option<Value>, CoreError>;

    /// Raw bytes of an attachment referenced from a payload.
    async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, CoreError>;
}

/// Production data source over the downstream HTTP client.
#[derive(Debug, Clone)]
pub struct HttpSubjectDataSource {
    client: DownstreamClient,
}

impl HttpSubjectDataSource {
    pub fn new(client: DownstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubjectDataSource for HttpSubjectDataSource {
    async fn fetch_data(&self, request: &RenderRequest) -> Result<Option<Value>, CoreError> {
        self.client
            .fetch_subject_data(
                &request.service_configuration.url,
                &request.subject_data_query(),
            )
            .await
            .map_err(|err| {
                CoreError::Internal(format!(
                    "data fetch from {} failed: {err}",
                    request.service_configuration.service_name
                ))
            })
    }

    async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        self.client
            .fetch_attachment(url)
            .await
            .map_err(|err| CoreError::Internal(format!("attachment fetch failed: {err}")))
    }
}
