//! Response extraction from batch output payloads.
//!
//! The output payload is newline-delimited JSON, one self-contained record
//! per submitted sub-request. Results are addressed by correlation key
//! (`custom_id`), never by position: output order is not guaranteed to match
//! submission order, so the scan filters on the key even though this tool
//! submits exactly one sub-request per job.
//!
//! Text recovery walks a closed tagged decoder in strict priority order:
//!
//! 1. the first `output` item tagged `message` holding a content entry
//!    tagged `output_text` with non-empty text,
//! 2. a top-level `output_text` field that is itself a non-empty string,
//! 3. a pretty-printed dump of the whole body, so the caller always gets
//!    something printable.

use serde::Deserialize;
use serde_json::Value;

use crate::api::BatchClient;
use crate::core::batch::{BatchRecord, BatchStatus, TokenUsage};
use crate::error::{ObatchError, Result};

/// The answer recovered from an output payload for one correlation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAnswer {
    pub text: String,
    pub usage: Option<TokenUsage>,
    /// Remote error object accompanying the matched record, if any. This is
    /// a non-fatal annotation; the extracted text is still returned.
    pub error: Option<String>,
}

/// Outcome of resolving a record's response, cached or freshly extracted.
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub error: Option<String>,
    /// True when the answer came from the local cache (no remote I/O).
    pub from_cache: bool,
}

/// Output items as a closed enumeration: a message, or something we do not
/// interpret (tool calls, reasoning traces, and whatever the remote adds).
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ContentEntry>,
    },
    #[serde(other)]
    Other,
}

/// Content entries inside a message, same closed-enumeration treatment.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentEntry {
    #[serde(rename = "output_text")]
    OutputText {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Resolve the response for a record: cache hit, or fetch-and-extract.
///
/// Precondition ladder, each step a distinct reportable failure:
/// 1. a cached `response` is returned immediately, with no remote I/O;
/// 2. a non-`completed` status fails with [`ObatchError::NotReady`];
/// 3. a missing output handle despite completion fails with
///    [`ObatchError::MissingOutput`].
///
/// On a successful extraction the record's `response` (and `usage`, when
/// present) are written in place; the caller persists the store. Remote
/// fetch failures surface as-is with no local mutation.
pub async fn resolve_response(
    client: &BatchClient,
    record: &mut BatchRecord,
) -> Result<ResolvedResponse> {
    if let Some(text) = &record.response {
        return Ok(ResolvedResponse {
            text: text.clone(),
            usage: record.usage.clone(),
            error: None,
            from_cache: true,
        });
    }

    if record.status != BatchStatus::Completed {
        return Err(ObatchError::NotReady {
            status: record.status,
        });
    }

    let Some(output_file_id) = record.output_file_id.clone() else {
        return Err(ObatchError::MissingOutput {
            request_id: record.request_id.clone(),
        });
    };

    let payload = client.file_content(&output_file_id).await?;
    let answer = extract_answer(&payload, &record.request_id)?;

    record.response = Some(answer.text.clone());
    if answer.usage.is_some() {
        record.usage = answer.usage.clone();
    }

    Ok(ResolvedResponse {
        text: answer.text,
        usage: answer.usage,
        error: answer.error,
        from_cache: false,
    })
}

/// Scan a newline-delimited payload for the record matching the correlation
/// key and recover its answer text.
///
/// Blank lines are skipped. A line that fails to parse is skipped too, with
/// a debug log — one malformed line must not hide a valid result elsewhere
/// in the file. Scanning stops at the first match.
///
/// # Errors
///
/// Returns [`ObatchError::ExtractionMiss`] when a full scan finds no record
/// with the given key: the payload exists but does not contain this job's
/// result, which is a data-consistency anomaly worth surfacing distinctly.
pub fn extract_answer(payload: &str, correlation_key: &str) -> Result<ExtractedAnswer> {
    for (line_no, line) in payload.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(line = line_no + 1, "skipping unparsable output line: {e}");
                continue;
            }
        };

        if record.get("custom_id").and_then(Value::as_str) != Some(correlation_key) {
            continue;
        }

        let body = record
            .pointer("/response/body")
            .cloned()
            .unwrap_or(Value::Null);

        let usage = record
            .pointer("/response/body/usage")
            .and_then(|u| serde_json::from_value::<TokenUsage>(u.clone()).ok());

        let error = record
            .get("error")
            .filter(|e| !e.is_null())
            .map(std::string::ToString::to_string);

        return Ok(ExtractedAnswer {
            text: recover_text(&body),
            usage,
            error,
        });
    }

    Err(ObatchError::ExtractionMiss {
        request_id: correlation_key.to_string(),
    })
}

/// Three-tier text recovery over a response body.
fn recover_text(body: &Value) -> String {
    // Tier 1: first message item with a non-empty output_text entry
    if let Some(items) = body.get("output") {
        if let Ok(items) = serde_json::from_value::<Vec<OutputItem>>(items.clone()) {
            for item in items {
                if let OutputItem::Message { content } = item {
                    for entry in content {
                        if let ContentEntry::OutputText { text } = entry {
                            if !text.is_empty() {
                                return text;
                            }
                        }
                    }
                }
            }
        }
    }

    // Tier 2: top-level output_text that is itself a plain string
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        if !text.is_empty() {
            return text.to_string();
        }
    }

    // Tier 3: structural dump so the caller still gets something printable
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output_line(custom_id: &str, text: &str) -> String {
        json!({
            "custom_id": custom_id,
            "response": {
                "body": {
                    "output": [
                        {"type": "message", "content": [
                            {"type": "output_text", "text": text}
                        ]}
                    ],
                    "usage": {"input_tokens": 12, "output_tokens": 34, "total_tokens": 46}
                }
            }
        })
        .to_string()
    }

    #[test]
    fn extracts_the_matching_line_not_the_first() {
        let payload = format!(
            "{}\n{}\n",
            output_line("req-aaaa1111", "first answer"),
            output_line("req-bbbb2222", "second answer"),
        );

        let answer = extract_answer(&payload, "req-bbbb2222").unwrap();
        assert_eq!(answer.text, "second answer");

        // Same result when the target appears first in the file.
        let reversed = format!(
            "{}\n{}\n",
            output_line("req-bbbb2222", "second answer"),
            output_line("req-aaaa1111", "first answer"),
        );
        let answer = extract_answer(&reversed, "req-bbbb2222").unwrap();
        assert_eq!(answer.text, "second answer");
    }

    #[test]
    fn captures_usage_from_matched_record() {
        let payload = output_line("req-aaaa1111", "hi");
        let answer = extract_answer(&payload, "req-aaaa1111").unwrap();
        let usage = answer.usage.unwrap();
        assert_eq!(usage.input_tokens, 12);
        assert_eq!(usage.output_tokens, 34);
        assert_eq!(usage.total(), 46);
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let payload = format!(
            "\n   \nnot json at all\n{{\"custom_id\": \"req-aaaa1111\", truncated\n{}\n",
            output_line("req-aaaa1111", "found it")
        );

        let answer = extract_answer(&payload, "req-aaaa1111").unwrap();
        assert_eq!(answer.text, "found it");
    }

    #[test]
    fn full_scan_without_match_is_extraction_miss() {
        let payload = output_line("req-aaaa1111", "someone else's answer");
        let err = extract_answer(&payload, "req-bbbb2222").unwrap_err();
        assert!(matches!(err, ObatchError::ExtractionMiss { request_id } if request_id == "req-bbbb2222"));
    }

    #[test]
    fn empty_payload_is_extraction_miss() {
        let err = extract_answer("", "req-aaaa1111").unwrap_err();
        assert!(matches!(err, ObatchError::ExtractionMiss { .. }));
    }

    #[test]
    fn duplicate_keys_first_line_wins() {
        let payload = format!(
            "{}\n{}\n",
            output_line("req-aaaa1111", "earlier"),
            output_line("req-aaaa1111", "later"),
        );
        let answer = extract_answer(&payload, "req-aaaa1111").unwrap();
        assert_eq!(answer.text, "earlier");
    }

    #[test]
    fn tier_two_top_level_output_text() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "response": {"body": {"output": [], "output_text": "hello"}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        assert_eq!(answer.text, "hello");
    }

    #[test]
    fn tier_two_ignores_non_string_output_text() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "response": {"body": {"output_text": ["not", "a", "string"]}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        // Falls to the structural dump
        assert!(answer.text.contains("output_text"));
    }

    #[test]
    fn tier_three_dump_is_non_empty() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "response": {"body": {"finish_reason": "stop"}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        assert!(!answer.text.is_empty());
        assert!(answer.text.contains("finish_reason"));
    }

    #[test]
    fn tier_one_skips_non_message_items_and_empty_text() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "response": {"body": {"output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": ""},
                    {"type": "output_text", "text": "the real answer"}
                ]}
            ]}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        assert_eq!(answer.text, "the real answer");
    }

    #[test]
    fn remote_error_is_surfaced_alongside_text() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "error": {"code": "server_error", "message": "partial failure"},
            "response": {"body": {"output_text": "degraded answer"}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        assert_eq!(answer.text, "degraded answer");
        let error = answer.error.unwrap();
        assert!(error.contains("server_error"));
    }

    #[test]
    fn null_error_is_not_an_annotation() {
        let line = json!({
            "custom_id": "req-aaaa1111",
            "error": null,
            "response": {"body": {"output_text": "fine"}}
        })
        .to_string();

        let answer = extract_answer(&line, "req-aaaa1111").unwrap();
        assert!(answer.error.is_none());
    }
}
