//! Status reconciliation against the remote system.
//!
//! Brings every record's volatile fields (`status`, `output_file_id`,
//! `completed_at`, `started_at`) up to date with the remote view, in one
//! listing call for bulk refresh or one retrieval for a single record.
//! Cached `response`/`usage` values are never touched.
//!
//! Reconciliation is best-effort: a remote failure aborts the refresh,
//! leaves local state untouched, and is reported to the caller as a warning
//! rather than a hard failure of the list/read operation.

use std::collections::HashMap;

use crate::api::{BatchClient, LIST_LIMIT, types::JobSummary};
use crate::core::batch::BatchRecord;
use crate::error::Result;

/// Merge one remote summary into a local record.
///
/// `status` is overwritten unconditionally; the output handle and the
/// timestamps are monotonic — a remote "unset" never erases a previously
/// observed value, and epoch zero counts as unset.
pub fn apply_summary(record: &mut BatchRecord, summary: &JobSummary) {
    record.status = summary.status;

    if let Some(output_file_id) = &summary.output_file_id {
        record.output_file_id = Some(output_file_id.clone());
    }
    if let Some(completed_at) = summary.completed_at.filter(|&ts| ts != 0) {
        record.completed_at = Some(completed_at);
    }
    if let Some(started_at) = summary.in_progress_at.filter(|&ts| ts != 0) {
        record.started_at = Some(started_at);
    }
}

/// Refresh every record that has a corresponding remote entry, using a
/// single listing call. Records missing from the listing are left as-is.
///
/// Returns the number of records updated.
///
/// # Errors
///
/// Returns the listing failure; no record is modified in that case.
pub async fn refresh_all(client: &BatchClient, records: &mut [BatchRecord]) -> Result<usize> {
    let summaries = client.list_batches(LIST_LIMIT).await?;
    let by_job_id: HashMap<&str, &JobSummary> =
        summaries.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut updated = 0;
    for record in records.iter_mut() {
        if let Some(summary) = by_job_id.get(record.job_id.as_str()) {
            apply_summary(record, summary);
            updated += 1;
        }
    }

    tracing::debug!(updated, total = records.len(), "bulk status refresh");
    Ok(updated)
}

/// Refresh a single record by retrieving its job.
///
/// # Errors
///
/// Returns the retrieval failure; the record is not modified in that case.
pub async fn refresh_one(client: &BatchClient, record: &mut BatchRecord) -> Result<()> {
    let summary = client.retrieve_batch(&record.job_id).await?;
    apply_summary(record, &summary);
    Ok(())
}
