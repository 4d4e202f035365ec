//! Configuration file loading and submission defaults.
//!
//! Loads configuration from `config.toml` in the platform config directory
//! (override with `OBATCH_CONFIG`).
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `OBATCH_MODEL`: default model for new requests
//! - `OBATCH_EFFORT`: default reasoning effort (none disables the block)
//! - `OBATCH_MAX_TOKENS`: default max output tokens
//! - `OBATCH_TIMEOUT`: HTTP timeout in seconds
//! - `OBATCH_NO_COLOR` or `NO_COLOR`: disable colors
//! - `OBATCH_CONFIG`: override config file path
//! - `OBATCH_DATA_DIR`: override data directory (record store location)

use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::pricing::{DEFAULT_MODEL, PricingTable};
use crate::error::{ObatchError, Result};
use crate::storage::paths::AppPaths;

/// Environment variable for the default model.
pub const ENV_MODEL: &str = "OBATCH_MODEL";
/// Environment variable for the default reasoning effort.
pub const ENV_EFFORT: &str = "OBATCH_EFFORT";
/// Environment variable for the default max output tokens.
pub const ENV_MAX_TOKENS: &str = "OBATCH_MAX_TOKENS";
/// Environment variable for the HTTP timeout in seconds.
pub const ENV_TIMEOUT: &str = "OBATCH_TIMEOUT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "OBATCH_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";

/// Default system prompt for new requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Default max output tokens for new requests.
pub const DEFAULT_MAX_TOKENS: u32 = 100_000;
/// Default reasoning effort for new requests.
pub const DEFAULT_EFFORT: &str = "xhigh";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reasoning effort values accepted by the Responses API, plus "none" to
/// omit the reasoning block entirely.
pub const EFFORT_CHOICES: &[&str] = &["none", "low", "medium", "high", "xhigh"];

/// On-disk config file contents. All fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub effort: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Load the config file if present.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but is not valid TOML; a
    /// missing file yields defaults.
    pub fn load(paths: &AppPaths) -> Result<Self> {
        let path = paths.config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            ObatchError::Config(format!("invalid config at {}: {e}", path.display()))
        })
    }
}

/// Fully resolved submission settings after merging CLI, env, and file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    /// Normalized reasoning effort; None omits the reasoning block.
    pub effort: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Settings {
    /// Resolve final settings from optional CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file is invalid, the model is not in
    /// the pricing table, or the effort is not a recognized choice.
    pub fn resolve(
        pricing: &PricingTable,
        model_flag: Option<&str>,
        effort_flag: Option<&str>,
        max_tokens_flag: Option<u32>,
    ) -> Result<Self> {
        let file = ConfigFile::load(&AppPaths::new())?;

        let model = model_flag
            .map(str::to_string)
            .or_else(|| env_string(ENV_MODEL))
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if !pricing.is_known(&model) {
            return Err(ObatchError::Config(format!(
                "unknown model '{model}' (supported: {})",
                pricing.known_models().join(", ")
            )));
        }

        let effort_raw = effort_flag
            .map(str::to_string)
            .or_else(|| env_string(ENV_EFFORT))
            .or(file.effort)
            .unwrap_or_else(|| DEFAULT_EFFORT.to_string());
        let effort = normalize_reasoning_effort(Some(&effort_raw));
        if let Some(value) = &effort {
            if !EFFORT_CHOICES.contains(&value.as_str()) {
                return Err(ObatchError::Config(format!(
                    "unknown reasoning effort '{value}' (choices: {})",
                    EFFORT_CHOICES.join(", ")
                )));
            }
        }

        let max_tokens = max_tokens_flag
            .or_else(|| env_string(ENV_MAX_TOKENS).and_then(|v| v.parse().ok()))
            .or(file.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = env_string(ENV_TIMEOUT)
            .and_then(|v| v.parse().ok())
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            model,
            effort,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Normalize a user-provided reasoning effort string.
///
/// Returns None if reasoning should be omitted entirely, or the normalized
/// lowercase effort otherwise.
#[must_use]
pub fn normalize_reasoning_effort(effort: Option<&str>) -> Option<String> {
    let value = effort?.trim().to_lowercase();
    match value.as_str() {
        "" | "none" | "off" | "false" | "0" | "disable" | "disabled" => None,
        _ => Some(value),
    }
}

/// Whether colored output should be used, honoring flags and env vars.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    if no_color_flag || env_truthy(ENV_NO_COLOR) || env_truthy(ENV_NO_COLOR_STD) {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

fn env_string(var: &str) -> Option<String> {
    std::env::var(var).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_truthy(var: &str) -> bool {
    env_string(var)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_effort_disabled_values() {
        for value in ["none", "off", "false", "0", "disable", "disabled", "", "  "] {
            assert_eq!(normalize_reasoning_effort(Some(value)), None, "{value:?}");
        }
        assert_eq!(normalize_reasoning_effort(None), None);
    }

    #[test]
    fn normalize_effort_lowercases() {
        assert_eq!(
            normalize_reasoning_effort(Some("XHigh")),
            Some("xhigh".to_string())
        );
        assert_eq!(
            normalize_reasoning_effort(Some(" low ")),
            Some("low".to_string())
        );
    }

    #[test]
    fn resolve_defaults() {
        let pricing = PricingTable::current();
        let settings = Settings::resolve(&pricing, None, None, None).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.effort, Some(DEFAULT_EFFORT.to_string()));
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn resolve_flags_override() {
        let pricing = PricingTable::current();
        let settings =
            Settings::resolve(&pricing, Some("gpt-5.2"), Some("low"), Some(4_096)).unwrap();
        assert_eq!(settings.model, "gpt-5.2");
        assert_eq!(settings.effort, Some("low".to_string()));
        assert_eq!(settings.max_tokens, 4_096);
    }

    #[test]
    fn resolve_effort_none_omits_reasoning() {
        let pricing = PricingTable::current();
        let settings = Settings::resolve(&pricing, None, Some("none"), None).unwrap();
        assert_eq!(settings.effort, None);
    }

    #[test]
    fn resolve_rejects_unknown_model() {
        let pricing = PricingTable::current();
        let err = Settings::resolve(&pricing, Some("gpt-0"), None, None).unwrap_err();
        assert!(err.to_string().contains("unknown model"));
        assert!(err.to_string().contains("gpt-5.2-pro"));
    }

    #[test]
    fn resolve_rejects_unknown_effort() {
        let pricing = PricingTable::current();
        let err = Settings::resolve(&pricing, None, Some("maximal"), None).unwrap_err();
        assert!(err.to_string().contains("unknown reasoning effort"));
    }

    #[test]
    fn config_file_parses_partial_toml() {
        let file: ConfigFile = toml::from_str("model = \"gpt-5.2\"").unwrap();
        assert_eq!(file.model.as_deref(), Some("gpt-5.2"));
        assert!(file.effort.is_none());
        assert!(file.max_tokens.is_none());
    }
}
