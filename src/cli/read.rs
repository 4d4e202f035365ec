//! The `read` command: reconcile one record and show its result.
//!
//! In `--response-only` mode nothing but the raw extracted text is written
//! to stdout; warnings and errors go to stderr with a non-zero exit, so the
//! command composes in shell pipelines.

use crate::api::BatchClient;
use crate::cli::args::{OutputFormat, ReadArgs};
use crate::core::batch::find_record_mut;
use crate::core::pricing::{PricingTable, estimate_cost};
use crate::core::{extract, reconcile};
use crate::error::{ObatchError, Result};
use crate::render;
use crate::storage::config::Settings;
use crate::storage::store::RecordStore;

/// Execute the read command.
pub async fn execute(
    args: &ReadArgs,
    format: OutputFormat,
    pretty: bool,
    color: bool,
) -> Result<()> {
    let pricing = PricingTable::current();
    let settings = Settings::resolve(&pricing, None, None, None)?;
    let client = BatchClient::from_env(settings.timeout)?;
    let store = RecordStore::new();
    let mut records = store.load();

    let record = find_record_mut(&mut records, &args.key)
        .ok_or_else(|| ObatchError::NotFound(args.key.clone()))?;

    // Best-effort single-record refresh
    let refresh = reconcile::refresh_one(&client, record).await;
    match refresh {
        Ok(()) => store.save(&records)?,
        Err(e) => {
            tracing::warn!(key = %args.key, "status refresh failed: {e}");
            eprintln!(
                "{}",
                render::human::render_warning(&format!("could not fetch batch status: {e}"), color)
            );
        }
    }

    let record = find_record_mut(&mut records, &args.key)
        .ok_or_else(|| ObatchError::NotFound(args.key.clone()))?;
    let request_id = record.request_id.clone();
    let model = record.model.clone();

    if args.response_only {
        let resolved = extract::resolve_response(&client, record).await?;
        if !resolved.from_cache {
            store.save(&records)?;
        }
        println!("{}", resolved.text);
        return Ok(());
    }

    if format == OutputFormat::Json {
        let resolved = extract::resolve_response(&client, record).await;
        if matches!(&resolved, Ok(r) if !r.from_cache) {
            store.save(&records)?;
        }
        let record = crate::core::batch::find_record(&records, &args.key).expect("found above");
        let rendered = if pretty {
            render::render_json_pretty(record)?
        } else {
            render::render_json(record)?
        };
        println!("{rendered}");
        // A missing result is still the operation's outcome in JSON mode,
        // except "still processing", which is plain status information.
        return match resolved {
            Ok(_) | Err(ObatchError::NotReady { .. }) => Ok(()),
            Err(e) => Err(e),
        };
    }

    println!("{}", render::human::render_record_panel(record, color));

    match extract::resolve_response(&client, record).await {
        Ok(resolved) => {
            if !resolved.from_cache {
                store.save(&records)?;
            }
            println!();
            println!(
                "{}",
                render::human::render_response_panel(&resolved.text, resolved.from_cache, color)
            );
            if let Some(usage) = &resolved.usage {
                let cost = estimate_cost(Some(usage), &model, &pricing);
                println!();
                println!(
                    "{}",
                    render::human::render_usage_line(usage, cost.as_ref(), color)
                );
            }
            if let Some(error) = &resolved.error {
                eprintln!(
                    "{}",
                    render::human::render_warning(
                        &format!("result carried an error object: {error}"),
                        color
                    )
                );
            }
            Ok(())
        }
        // Still processing is status information, not an error
        Err(ObatchError::NotReady { status }) if status.is_processing() => {
            println!();
            println!(
                "Batch is still processing. Status: {}",
                render::human::styled_status(status, color)
            );
            println!("Run 'obatch read {request_id}' again later.");
            Ok(())
        }
        // Terminal without results: failed/expired/cancelled
        Err(ObatchError::NotReady { status }) => {
            println!();
            println!(
                "Batch {}. No results available.",
                render::human::styled_status(status, color)
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}
