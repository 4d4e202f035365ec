//! Output rendering: human tables/panels and robot-mode JSON.

pub mod human;

use crate::error::Result;

/// Render any serializable value as JSON.
pub fn render_json<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

/// Render any serializable value as pretty JSON.
pub fn render_json_pretty<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
