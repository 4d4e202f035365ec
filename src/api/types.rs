//! Wire types for the batch API.

use serde::{Deserialize, Serialize};

use crate::core::batch::BatchStatus;

/// One job summary as returned by the list/retrieve endpoints.
///
/// Only the fields the reconciler consumes are modeled; the remote sends
/// more, which serde ignores.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub output_file_id: Option<String>,
    /// Unix epoch seconds.
    #[serde(default)]
    pub completed_at: Option<i64>,
    /// Unix epoch seconds.
    #[serde(default)]
    pub in_progress_at: Option<i64>,
}

/// Envelope for the batch listing endpoint.
#[derive(Debug, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub data: Vec<JobSummary>,
}

/// Handle returned by the file upload endpoint.
#[derive(Debug, Deserialize)]
pub struct FileHandle {
    pub id: String,
}

/// One line of the uploaded request payload.
#[derive(Debug, Serialize)]
pub struct RequestLine<'a> {
    pub custom_id: &'a str,
    pub method: &'static str,
    pub url: &'static str,
    pub body: RequestBody<'a>,
}

/// Responses API request body.
#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    pub model: &'a str,
    pub instructions: &'a str,
    pub input: &'a str,
    pub max_output_tokens: u32,
    /// Omitted entirely when reasoning is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning<'a>>,
}

/// Reasoning block for the Responses API.
#[derive(Debug, Serialize)]
pub struct Reasoning<'a> {
    pub effort: &'a str,
}

/// Body for the batch creation endpoint.
#[derive(Debug, Serialize)]
pub struct CreateBatchBody<'a> {
    pub input_file_id: &'a str,
    pub endpoint: &'static str,
    pub completion_window: &'static str,
}
