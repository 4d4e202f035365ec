//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Submit and track OpenAI Batch API text-generation jobs.
#[derive(Parser, Debug)]
#[command(name = "obatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub const fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables and panels for humans
    Human,
    /// Stable JSON for scripts and agents
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a new batch request
    Create(CreateArgs),

    /// List all batch requests with refreshed status
    List,

    /// Read the result of a batch request
    Read(ReadArgs),

    /// Show supported models and their batch pricing
    Models,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `create` command.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// The prompt to send (read from stdin if not provided)
    pub prompt: Option<String>,

    /// System prompt
    #[arg(long, short = 's', value_name = "TEXT")]
    pub system: Option<String>,

    /// Max output tokens
    #[arg(long, short = 'm', value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Model to use (see `obatch models`)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Reasoning effort (none, low, medium, high, xhigh)
    #[arg(long, value_name = "EFFORT")]
    pub effort: Option<String>,
}

/// Arguments for the `read` command.
#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Request ID or Job ID to read
    pub key: String,

    /// Output only the response text (for piping)
    #[arg(long, short = 'r')]
    pub response_only: bool,
}
