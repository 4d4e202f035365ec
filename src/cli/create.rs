//! The `create` command: submit a new batch request.

use std::io::Read;

use chrono::Utc;

use crate::api::BatchClient;
use crate::api::types::{Reasoning, RequestBody, RequestLine};
use crate::cli::args::{CreateArgs, OutputFormat};
use crate::core::batch::BatchRecord;
use crate::core::pricing::PricingTable;
use crate::error::{ObatchError, Result};
use crate::render;
use crate::storage::config::{DEFAULT_SYSTEM_PROMPT, Settings};
use crate::storage::store::RecordStore;

/// Execute the create command.
pub async fn execute(
    args: &CreateArgs,
    format: OutputFormat,
    pretty: bool,
    color: bool,
) -> Result<()> {
    let pricing = PricingTable::current();
    let settings = Settings::resolve(
        &pricing,
        args.model.as_deref(),
        args.effort.as_deref(),
        args.max_tokens,
    )?;

    let prompt = resolve_prompt(args.prompt.as_deref())?;
    let system_prompt = args
        .system
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    let client = BatchClient::from_env(settings.timeout)?;
    let store = RecordStore::new();

    let request_id = BatchRecord::new_request_id();
    let line = RequestLine {
        custom_id: &request_id,
        method: "POST",
        url: "/v1/responses",
        body: RequestBody {
            model: &settings.model,
            instructions: &system_prompt,
            input: &prompt,
            max_output_tokens: settings.max_tokens,
            reasoning: settings
                .effort
                .as_deref()
                .map(|effort| Reasoning { effort }),
        },
    };
    let mut jsonl = serde_json::to_string(&line)?;
    jsonl.push('\n');

    let human = format == OutputFormat::Human;
    if human {
        println!("Uploading batch file...");
    }
    let input_file_id = client.upload_request_file(jsonl).await?;

    if human {
        println!("Creating batch job...");
    }
    let summary = client.create_batch(&input_file_id).await?;
    tracing::info!(job_id = %summary.id, %request_id, "batch created");

    let record = BatchRecord {
        request_id,
        job_id: summary.id,
        input_file_id,
        prompt,
        system_prompt,
        model: settings.model,
        max_tokens: settings.max_tokens,
        status: summary.status,
        created_at: Utc::now(),
        started_at: None,
        completed_at: None,
        output_file_id: summary.output_file_id,
        response: None,
        usage: None,
    };
    store.append(record.clone())?;

    match format {
        OutputFormat::Json => {
            let rendered = if pretty {
                render::render_json_pretty(&record)?
            } else {
                render::render_json(&record)?
            };
            println!("{rendered}");
        }
        OutputFormat::Human => {
            println!();
            println!("Batch created successfully!");
            println!("  Request ID: {}", record.request_id);
            println!("  Job ID:     {}", record.job_id);
            println!(
                "  Status:     {}",
                render::human::styled_status(record.status, color)
            );
            println!("  Model:      {}", record.model);
        }
    }

    Ok(())
}

/// Use the prompt argument, or read it from stdin when piped.
fn resolve_prompt(arg: Option<&str>) -> Result<String> {
    let prompt = match arg {
        Some(prompt) => prompt.to_string(),
        None => {
            if atty::is(atty::Stream::Stdin) {
                return Err(ObatchError::Config(
                    "no prompt provided; pass one as an argument or pipe it on stdin".to_string(),
                ));
            }
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer.trim().to_string()
        }
    };

    if prompt.is_empty() {
        return Err(ObatchError::Config("empty prompt".to_string()));
    }
    Ok(prompt)
}
