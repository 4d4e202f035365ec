//! obatch - OpenAI Batch CLI
//!
//! Submit long-running text-generation jobs to the OpenAI Batch API, track
//! their lifecycle in a durable local record store, and retrieve/extract
//! the final answer once ready.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;

pub use error::{ExitCode, ObatchError, Result};
