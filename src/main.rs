//! obatch - OpenAI Batch CLI
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::process::ExitCode;

use obatch::cli::{Cli, Commands};
use obatch::core::logging;
use obatch::storage::config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(|| logging::parse_log_level_from_env().map(logging::LogLevel::from_tracing_level))
        .unwrap_or_default();
    let log_format = logging::parse_log_format_from_env().unwrap_or_default();
    let log_file = logging::parse_log_file_from_env();
    logging::init(log_level, log_format, log_file, cli.verbose);

    let color = config::should_use_color(cli.no_color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            let prefix = if color {
                "Error:".red().bold().to_string()
            } else {
                "Error:".to_string()
            };
            eprintln!("{prefix} {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> obatch::Result<()> {
    let format = cli.effective_format();
    let pretty = cli.pretty;
    let color = config::should_use_color(cli.no_color);

    match cli.command {
        None => {
            print_quickstart();
            Ok(())
        }

        Some(Commands::Create(args)) => {
            obatch::cli::create::execute(&args, format, pretty, color).await
        }

        Some(Commands::List) => obatch::cli::list::execute(format, pretty, color).await,

        Some(Commands::Read(args)) => {
            obatch::cli::read::execute(&args, format, pretty, color).await
        }

        Some(Commands::Models) => obatch::cli::models::execute(format, pretty),

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r#"obatch - OpenAI Batch CLI

Submit text-generation jobs to the Batch API and read the results later
at half the price of synchronous calls.

USAGE:
    obatch [OPTIONS] <COMMAND>

COMMANDS:
    create       Submit a new batch request
    list         List all batch requests with refreshed status
    read         Read the result of a batch request
    models       Show supported models and their batch pricing

QUICK START:
    obatch create "Explain quantum computing"
    obatch create "Summarize this" --system "You are terse" -m 2048
    obatch list
    obatch read req-abc12345
    obatch read req-abc12345 --response-only | wc -w

ROBOT MODE (for scripts and agents):
    obatch list --json
    obatch read req-abc12345 --json --pretty

The OPENAI_API_KEY environment variable must be set.

For more help: obatch --help
"#
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
