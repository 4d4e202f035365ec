//! HTTP client for the batch API.
//!
//! Wraps the handful of endpoints this tool consumes: file upload, batch
//! creation, listing, retrieval, and result-file content download. Network
//! failures and non-success statuses are mapped into the error taxonomy;
//! callers decide whether a failure is fatal (submission, extraction) or a
//! warning (reconciliation).

pub mod types;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response};

use crate::error::{ObatchError, Result};
use self::types::{CreateBatchBody, FileHandle, JobList, JobSummary};

/// Default base URL for the batch API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the base URL (used by tests).
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Listing page size for bulk reconciliation.
pub const LIST_LIMIT: usize = 100;

/// Completion window requested for every batch.
const COMPLETION_WINDOW: &str = "24h";

/// Endpoint every sub-request targets.
const RESPONSES_ENDPOINT: &str = "/v1/responses";

/// Client for the batch API.
pub struct BatchClient {
    http: Client,
    base_url: String,
}

impl BatchClient {
    /// Build a client from `OPENAI_API_KEY` (and `OPENAI_BASE_URL` if set).
    ///
    /// # Errors
    ///
    /// Returns [`ObatchError::MissingApiKey`] when the key is unset, or a
    /// network error when client construction fails.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ObatchError::MissingApiKey)?;
        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(&api_key, base_url, timeout)
    }

    /// Build a client against a specific base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(api_key: &str, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ObatchError::Config(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(format!("obatch/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ObatchError::RemoteUnavailable {
                message: e.to_string(),
            })?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    /// Upload a one-line JSONL request payload to the Files API.
    ///
    /// Returns the remote file id.
    pub async fn upload_request_file(&self, jsonl: String) -> Result<String> {
        let part = Part::text(jsonl)
            .file_name("batch.jsonl")
            .mime_str("application/jsonl")
            .map_err(|e| ObatchError::Config(format!("invalid upload part: {e}")))?;
        let form = Form::new().text("purpose", "batch").part("file", part);

        let response = self
            .http
            .post(format!("{}/v1/files", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        let handle: FileHandle = read_json(response).await?;
        Ok(handle.id)
    }

    /// Create a batch job over a previously uploaded request file.
    pub async fn create_batch(&self, input_file_id: &str) -> Result<JobSummary> {
        let body = CreateBatchBody {
            input_file_id,
            endpoint: RESPONSES_ENDPOINT,
            completion_window: COMPLETION_WINDOW,
        };

        let response = self
            .http
            .post(format!("{}/v1/batches", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response).await
    }

    /// List recent batch jobs.
    pub async fn list_batches(&self, limit: usize) -> Result<Vec<JobSummary>> {
        let response = self
            .http
            .get(format!("{}/v1/batches", self.base_url))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(map_send_error)?;
        let list: JobList = read_json(response).await?;
        Ok(list.data)
    }

    /// Retrieve one batch job by its remote id.
    pub async fn retrieve_batch(&self, job_id: &str) -> Result<JobSummary> {
        let response = self
            .http
            .get(format!("{}/v1/batches/{job_id}", self.base_url))
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response).await
    }

    /// Download the raw content of a remote file (newline-delimited JSON).
    pub async fn file_content(&self, file_id: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/v1/files/{file_id}/content", self.base_url))
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;
        response.text().await.map_err(map_send_error)
    }
}

/// Map a transport-level send error into the taxonomy.
fn map_send_error(e: reqwest::Error) -> ObatchError {
    if e.is_timeout() {
        ObatchError::Timeout(DEFAULT_TIMEOUT.as_secs())
    } else {
        ObatchError::RemoteUnavailable {
            message: e.to_string(),
        }
    }
}

/// Fail on non-success statuses, carrying a truncated response body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(500)
        .collect::<String>();
    Err(ObatchError::Api {
        status_code: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            message
        },
    })
}

/// Check status then decode the JSON body.
async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ObatchError::ParseResponse(e.to_string()))
}
