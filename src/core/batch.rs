//! Batch record data model.
//!
//! A [`BatchRecord`] is one user-submitted job: the immutable submission
//! parameters, the remote identifiers assigned at submission time, and the
//! volatile lifecycle fields kept in sync by the status reconciler. The
//! extracted answer is cached on the record itself so a completed job is
//! fetched from the remote system at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a remote batch job.
///
/// Values mirror the remote system's status strings. Anything the remote
/// adds later deserializes to [`BatchStatus::Unknown`], which is treated as
/// non-terminal so the tool keeps polling instead of inventing an end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Validating,
    InProgress,
    Finalizing,
    Completed,
    Failed,
    Expired,
    Cancelling,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    /// The wire/display string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::InProgress => "in_progress",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Whether no further remote progress is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Cancelled
        )
    }

    /// Whether the job is still being worked on remotely.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(
            self,
            Self::Validating
                | Self::InProgress
                | Self::Finalizing
                | Self::Cancelling
                | Self::Unknown
        )
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Token usage reported on a completed result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    /// Total tokens, computed when the remote omits the total.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total_tokens
            .unwrap_or(self.input_tokens + self.output_tokens)
    }

    /// Whether the usage carries no token counts at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.input_tokens == 0 && self.output_tokens == 0
    }
}

/// One submitted batch job, as persisted in the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Locally generated short identifier, doubles as the correlation key
    /// echoed back in the result payload.
    pub request_id: String,
    /// Remote job identifier, assigned at submission time.
    pub job_id: String,
    /// Remote handle to the uploaded request payload.
    pub input_file_id: String,
    pub prompt: String,
    pub system_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    /// Latest known remote status; the remote value always wins.
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    /// Unix epoch seconds, set once the remote reports the job started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Unix epoch seconds, set once the remote reports completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Remote handle to the result payload; never cleared once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_id: Option<String>,
    /// Locally cached extracted answer; written at most once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl BatchRecord {
    /// Mint a fresh correlation key: `req-` plus 8 hex chars.
    #[must_use]
    pub fn new_request_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("req-{}", &hex[..8])
    }

    /// Whether the given opaque key refers to this record, by either the
    /// local request id or the remote job id.
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.request_id == key || self.job_id == key
    }

    /// Short preview of the prompt for table display.
    #[must_use]
    pub fn prompt_preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.prompt.chars().take(max_chars).collect();
        if self.prompt.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}

/// Find a record by an opaque key (request id or job id).
///
/// The first match in store order wins; duplicate keys are a
/// data-integrity bug, not a runtime error.
#[must_use]
pub fn find_record<'a>(records: &'a [BatchRecord], key: &str) -> Option<&'a BatchRecord> {
    records.iter().find(|r| r.matches_key(key))
}

/// Mutable variant of [`find_record`].
pub fn find_record_mut<'a>(
    records: &'a mut [BatchRecord],
    key: &str,
) -> Option<&'a mut BatchRecord> {
    records.iter_mut().find(|r| r.matches_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(request_id: &str, job_id: &str) -> BatchRecord {
        BatchRecord {
            request_id: request_id.to_string(),
            job_id: job_id.to_string(),
            input_file_id: "file-in".to_string(),
            prompt: "What is the airspeed velocity of an unladen swallow?".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            model: "gpt-5.2-pro".to_string(),
            max_tokens: 100_000,
            status: BatchStatus::Validating,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            output_file_id: None,
            response: None,
            usage: None,
        }
    }

    #[test]
    fn request_id_format() {
        let id = BatchRecord::new_request_id();
        assert!(id.starts_with("req-"));
        assert_eq!(id.len(), 12);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn request_ids_are_unique() {
        let a = BatchRecord::new_request_id();
        let b = BatchRecord::new_request_id();
        assert_ne!(a, b);
    }

    #[test]
    fn status_round_trips_through_serde() {
        for status in [
            BatchStatus::Validating,
            BatchStatus::InProgress,
            BatchStatus::Finalizing,
            BatchStatus::Completed,
            BatchStatus::Failed,
            BatchStatus::Expired,
            BatchStatus::Cancelling,
            BatchStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: BatchStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let status: BatchStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, BatchStatus::Unknown);
        assert!(!status.is_terminal());
        assert!(status.is_processing());
    }

    #[test]
    fn terminal_and_processing_partition() {
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Failed.is_terminal());
        assert!(BatchStatus::Expired.is_terminal());
        assert!(BatchStatus::Cancelled.is_terminal());
        assert!(BatchStatus::Validating.is_processing());
        assert!(BatchStatus::InProgress.is_processing());
        assert!(BatchStatus::Finalizing.is_processing());
        assert!(!BatchStatus::Completed.is_processing());
    }

    #[test]
    fn usage_total_prefers_reported_value() {
        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
            total_tokens: Some(35),
        };
        assert_eq!(usage.total(), 35);

        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
            total_tokens: None,
        };
        assert_eq!(usage.total(), 30);
    }

    #[test]
    fn find_by_request_id_and_job_id_return_same_record() {
        let records = vec![
            make_record("req-aaaa1111", "batch_one"),
            make_record("req-bbbb2222", "batch_two"),
        ];

        let by_request = find_record(&records, "req-bbbb2222").unwrap();
        let by_job = find_record(&records, "batch_two").unwrap();
        assert_eq!(by_request.request_id, by_job.request_id);
        assert_eq!(by_request.job_id, "batch_two");
    }

    #[test]
    fn find_unknown_key_is_none() {
        let records = vec![make_record("req-aaaa1111", "batch_one")];
        assert!(find_record(&records, "req-zzzz9999").is_none());
    }

    #[test]
    fn duplicate_keys_first_match_in_store_order_wins() {
        let mut records = vec![
            make_record("req-dupe0000", "batch_first"),
            make_record("req-dupe0000", "batch_second"),
        ];

        let found = find_record(&records, "req-dupe0000").unwrap();
        assert_eq!(found.job_id, "batch_first");

        let found = find_record_mut(&mut records, "req-dupe0000").unwrap();
        assert_eq!(found.job_id, "batch_first");
    }

    #[test]
    fn prompt_preview_truncates() {
        let record = make_record("req-aaaa1111", "batch_one");
        let preview = record.prompt_preview(10);
        assert_eq!(preview, "What is th...");

        let short = record.prompt_preview(1000);
        assert_eq!(short, record.prompt);
    }

    #[test]
    fn record_serde_round_trip_preserves_optionals() {
        let mut record = make_record("req-aaaa1111", "batch_one");
        record.status = BatchStatus::Completed;
        record.output_file_id = Some("file-out".to_string());
        record.completed_at = Some(1_754_000_000);
        record.response = Some("hello".to_string());
        record.usage = Some(TokenUsage {
            input_tokens: 5,
            output_tokens: 7,
            total_tokens: None,
        });

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: BatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.request_id, record.request_id);
        assert_eq!(back.output_file_id, record.output_file_id);
        assert_eq!(back.response, record.response);
        assert_eq!(back.usage, record.usage);
        assert!(back.started_at.is_none());
    }
}
