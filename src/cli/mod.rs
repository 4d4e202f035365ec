//! Command-line interface: argument definitions and command execution.

pub mod args;
pub mod create;
pub mod list;
pub mod models;
pub mod read;

pub use args::{Cli, Commands, OutputFormat};
