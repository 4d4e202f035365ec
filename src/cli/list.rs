//! The `list` command: reconcile and display all batch requests.

use crate::api::BatchClient;
use crate::cli::args::OutputFormat;
use crate::core::reconcile;
use crate::error::Result;
use crate::render;
use crate::storage::config::Settings;
use crate::storage::store::RecordStore;

/// Execute the list command.
pub async fn execute(format: OutputFormat, pretty: bool, color: bool) -> Result<()> {
    let pricing = crate::core::pricing::PricingTable::current();
    let settings = Settings::resolve(&pricing, None, None, None)?;
    let client = BatchClient::from_env(settings.timeout)?;
    let store = RecordStore::new();
    let mut records = store.load();

    // Best-effort refresh: remote failure degrades to a warning and the
    // already-known local data still displays.
    match reconcile::refresh_all(&client, &mut records).await {
        Ok(_) => store.save(&records)?,
        Err(e) => {
            tracing::warn!("bulk status refresh failed: {e}");
            eprintln!(
                "{}",
                render::human::render_warning(
                    &format!("could not fetch remote status: {e}"),
                    color
                )
            );
        }
    }

    match format {
        OutputFormat::Json => {
            let rendered = if pretty {
                render::render_json_pretty(&records)?
            } else {
                render::render_json(&records)?
            };
            println!("{rendered}");
        }
        OutputFormat::Human => {
            println!("{}", render::human::render_record_table(&records, color));
        }
    }

    Ok(())
}
