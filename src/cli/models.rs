//! The `models` command: show supported models and their batch pricing.

use crate::cli::args::OutputFormat;
use crate::core::pricing::{DEFAULT_MODEL, PricingTable};
use crate::error::Result;
use crate::render;

/// Execute the models command.
pub fn execute(format: OutputFormat, pretty: bool) -> Result<()> {
    let pricing = PricingTable::current();

    if format == OutputFormat::Json {
        let entries: Vec<serde_json::Value> = pricing
            .known_models()
            .iter()
            .map(|model| {
                let p = pricing.get(model).expect("known model");
                serde_json::json!({
                    "model": model,
                    "input_per_million_usd": p.input_per_million,
                    "output_per_million_usd": p.output_per_million,
                    "default": *model == DEFAULT_MODEL,
                })
            })
            .collect();
        let rendered = if pretty {
            render::render_json_pretty(&entries)?
        } else {
            render::render_json(&entries)?
        };
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "{:<16} {:>12} {:>12}",
        "MODEL", "INPUT $/1M", "OUTPUT $/1M"
    );
    println!("{}", "─".repeat(42));
    for model in pricing.known_models() {
        let p = pricing.get(model).expect("known model");
        let marker = if model == DEFAULT_MODEL { " (default)" } else { "" };
        println!(
            "{:<16} {:>12.3} {:>12.2}{marker}",
            model, p.input_per_million, p.output_per_million
        );
    }

    Ok(())
}
