//! Human-readable output: record tables, detail panels, status styling.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::core::batch::{BatchRecord, BatchStatus, TokenUsage};
use crate::core::pricing::CostEstimate;

const RULE_WIDTH: usize = 100;
const PROMPT_PREVIEW_CHARS: usize = 40;
const JOB_ID_PREVIEW_CHARS: usize = 24;

/// Style a status string for terminal display.
#[must_use]
pub fn styled_status(status: BatchStatus, color: bool) -> String {
    let text = status.as_str();
    if !color {
        return text.to_string();
    }
    match status {
        BatchStatus::Completed => text.green().to_string(),
        BatchStatus::InProgress | BatchStatus::Finalizing => text.yellow().to_string(),
        BatchStatus::Validating => text.blue().to_string(),
        BatchStatus::Failed | BatchStatus::Expired => text.red().to_string(),
        BatchStatus::Cancelling | BatchStatus::Cancelled => text.dimmed().to_string(),
        BatchStatus::Unknown => text.to_string(),
    }
}

/// Format a local creation timestamp.
#[must_use]
pub fn format_created(created_at: &DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Format an optional epoch-seconds timestamp, "-" when unset.
#[must_use]
pub fn format_epoch(ts: Option<i64>) -> String {
    ts.and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || "-".to_string(),
            |dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        )
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut out: String = value.chars().take(max_chars).collect();
    if value.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

/// Render all records as an aligned table, most recent first.
#[must_use]
pub fn render_record_table(records: &[BatchRecord], color: bool) -> String {
    if records.is_empty() {
        return "No batch requests found.".to_string();
    }

    let mut lines = Vec::new();
    let header = format!(
        "{:<14} {:<28} {:<12} {:<20} {:<20} {}",
        "REQUEST ID", "JOB ID", "STATUS", "CREATED", "COMPLETED", "PROMPT"
    );
    lines.push(if color {
        header.bold().to_string()
    } else {
        header
    });
    lines.push("─".repeat(RULE_WIDTH));

    // Storage order is oldest-first; display newest-first
    for record in records.iter().rev() {
        // Pad the status before styling so ANSI codes don't break alignment
        let status = styled_status(record.status, color);
        let pad = 12usize.saturating_sub(record.status.as_str().len());
        lines.push(format!(
            "{:<14} {:<28} {}{} {:<20} {:<20} {}",
            record.request_id,
            truncate(&record.job_id, JOB_ID_PREVIEW_CHARS),
            status,
            " ".repeat(pad),
            format_created(&record.created_at),
            format_epoch(record.completed_at),
            record.prompt_preview(PROMPT_PREVIEW_CHARS),
        ));
    }

    lines.join("\n")
}

/// Render one record's submission details.
#[must_use]
pub fn render_record_panel(record: &BatchRecord, color: bool) -> String {
    let title = "Request Details";
    let mut lines = vec![
        if color {
            title.bold().to_string()
        } else {
            title.to_string()
        },
        "─".repeat(RULE_WIDTH),
    ];

    lines.push(format!("  Request ID: {}", record.request_id));
    lines.push(format!("  Job ID:     {}", record.job_id));
    lines.push(format!(
        "  Status:     {}",
        styled_status(record.status, color)
    ));
    lines.push(format!("  Model:      {}", record.model));
    lines.push(format!("  Created:    {}", format_created(&record.created_at)));
    lines.push(format!("  Started:    {}", format_epoch(record.started_at)));
    lines.push(format!("  Completed:  {}", format_epoch(record.completed_at)));
    lines.push(String::new());
    lines.push(format!("  System Prompt: {}", record.system_prompt));
    lines.push(String::new());
    lines.push(format!("  User Prompt: {}", record.prompt));

    lines.join("\n")
}

/// Render the extracted response, marking cache hits.
#[must_use]
pub fn render_response_panel(text: &str, from_cache: bool, color: bool) -> String {
    let title = if from_cache {
        "Response (cached)"
    } else {
        "Response"
    };
    let title = if color {
        title.green().bold().to_string()
    } else {
        title.to_string()
    };

    format!("{title}\n{}\n{text}", "─".repeat(RULE_WIDTH))
}

/// Render the token usage summary with an optional cost estimate.
#[must_use]
pub fn render_usage_line(usage: &TokenUsage, cost: Option<&CostEstimate>, color: bool) -> String {
    let mut line = format!(
        "Tokens: {} input + {} output = {} total",
        usage.input_tokens,
        usage.output_tokens,
        usage.total()
    );

    if let Some(cost) = cost {
        line.push_str(&format!(
            "\nEstimated cost: ${:.4} input + ${:.4} output = ${:.4} total",
            cost.input_cost_usd, cost.output_cost_usd, cost.total_cost_usd
        ));
    }

    if color { line.dimmed().to_string() } else { line }
}

/// Render a reconciliation warning.
#[must_use]
pub fn render_warning(message: &str, color: bool) -> String {
    let line = format!("Warning: {message}");
    if color { line.yellow().to_string() } else { line }
}
