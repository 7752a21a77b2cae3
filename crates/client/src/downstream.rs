//! HTTP client for downstream SAR data services.
//!
//! Every downstream service exposes the same two endpoints relative to
//! its configured base URL:
//!
//! - `GET /subject-access-request/template` — the service's current
//!   report template
//! - `GET /subject-access-request?prn=..&crn=..&fromDate=..&toDate=..`
//!   — the subject's data payload (204 = no data held)
//!
//! Transient failures (connection errors, 5xx) are retried here with a
//! short backoff. Callers treat whatever this returns as final.

use std::time::Duration;

use serde_json::Value;

/// Attempts per request, including the first.
const MAX_ATTEMPTS: u32 = 3;
/// Base delay between attempts; doubled per retry.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Errors from downstream service calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Status and body of a downstream template fetch.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    pub status: u16,
    pub body: String,
}

/// Query parameters for a subject data fetch.
#[derive(Debug, Clone, Default)]
pub struct SubjectDataQuery {
    pub prn: Option<String>,
    pub crn: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Retrying HTTP client for downstream services.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
}

impl Default for DownstreamClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl DownstreamClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { http }
    }

    /// Fetch a service's current template body.
    pub async fn fetch_template(&self, base_url: &str) -> Result<TemplateResponse, ClientError> {
        let url = format!(
            "{}/subject-access-request/template",
            base_url.trim_end_matches('/')
        );
        let response = self.get_with_retry(&url, &[]).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TemplateResponse { status, body })
    }

    /// Fetch a subject's data payload from a service.
    ///
    /// Returns `None` when the service holds no data for the subject
    /// (HTTP 204 or an empty body).
    pub async fn fetch_subject_data(
        &self,
        base_url: &str,
        query: &SubjectDataQuery,
    ) -> Result<Option<Value>, ClientError> {
        let url = format!(
            "{}/subject-access-request",
            base_url.trim_end_matches('/')
        );
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(prn) = &query.prn {
            params.push(("prn", prn.clone()));
        }
        if let Some(crn) = &query.crn {
            params.push(("crn", crn.clone()));
        }
        if let Some(from) = &query.from_date {
            params.push(("fromDate", from.clone()));
        }
        if let Some(to) = &query.to_date {
            params.push(("toDate", to.clone()));
        }

        let response = self.get_with_retry(&url, &params).await?;
        if response.status().as_u16() == 204 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&body)
            .map_err(|_| ClientError::UnexpectedStatus {
                status: 200,
                url,
            })?;
        Ok(Some(value))
    }

    /// Fetch an attachment's raw bytes from an absolute URL.
    pub async fn fetch_attachment(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.get_with_retry(url, &[]).await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// GET with bounded retry on connection errors and 5xx responses.
    async fn get_with_retry(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, ClientError> {
        let mut delay = RETRY_BASE_DELAY;

        for attempt in 1..=MAX_ATTEMPTS {
            let last_attempt = attempt == MAX_ATTEMPTS;
            let result = self.http.get(url).query(params).send().await;
            let retryable = match result {
                Ok(response) if response.status().is_server_error() => {
                    tracing::warn!(
                        url,
                        status = response.status().as_u16(),
                        attempt,
                        "Downstream returned server error"
                    );
                    ClientError::UnexpectedStatus {
                        status: response.status().as_u16(),
                        url: url.to_string(),
                    }
                }
                Ok(response) => return Ok(response),
                Err(err) if err.is_connect() || err.is_timeout() => {
                    tracing::warn!(url, attempt, error = %err, "Downstream request failed");
                    ClientError::Http(err)
                }
                Err(err) => return Err(ClientError::Http(err)),
            };

            if last_attempt {
                return Err(retryable);
            }
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        unreachable!("retry loop always returns")
    }
}
