//! Batch API pricing and cost estimation.
//!
//! The price table is an immutable lookup injected into the estimator and
//! the record-creation path; there is no process-wide singleton. Prices are
//! dollars per million tokens, input and output priced independently.

use std::collections::HashMap;

use crate::core::batch::TokenUsage;

/// Default model for new batch requests.
pub const DEFAULT_MODEL: &str = "gpt-5.2-pro";

/// Per-million token pricing for a specific model.
#[derive(Debug, Clone, Copy)]
pub struct ModelPricing {
    /// Cost per million input tokens (USD).
    pub input_per_million: f64,
    /// Cost per million output tokens (USD).
    pub output_per_million: f64,
}

/// Collection of model pricing data.
#[derive(Debug, Clone)]
pub struct PricingTable {
    /// Model name to pricing mapping (normalized lowercase).
    models: HashMap<String, ModelPricing>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::current()
    }
}

impl PricingTable {
    /// Create a pricing table with current Batch API pricing.
    #[must_use]
    pub fn current() -> Self {
        let mut models = HashMap::new();
        Self::add_model(&mut models, "gpt-5.2", 0.875, 7.0);
        Self::add_model(&mut models, "o3-pro", 10.0, 40.0);
        Self::add_model(&mut models, "gpt-5.2-pro", 10.5, 84.0);
        Self { models }
    }

    /// Create an empty table (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Add or replace a model entry.
    pub fn add(&mut self, model: &str, input_per_million: f64, output_per_million: f64) {
        Self::add_model(&mut self.models, model, input_per_million, output_per_million);
    }

    fn add_model(
        models: &mut HashMap<String, ModelPricing>,
        model: &str,
        input_per_million: f64,
        output_per_million: f64,
    ) {
        models.insert(
            model.to_lowercase(),
            ModelPricing {
                input_per_million,
                output_per_million,
            },
        );
    }

    /// Look up pricing for a model by name (case-insensitive).
    ///
    /// Returns None if the model is not in the pricing table; callers must
    /// report "unknown" rather than substitute a guessed price.
    #[must_use]
    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.models.get(&model.to_lowercase())
    }

    /// Whether the model has a pricing entry.
    #[must_use]
    pub fn is_known(&self, model: &str) -> bool {
        self.get(model).is_some()
    }

    /// All known model names, sorted.
    #[must_use]
    pub fn known_models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Estimated cost for one result, in USD.
///
/// No rounding is performed here; display layers round for presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub input_cost_usd: f64,
    pub output_cost_usd: f64,
    pub total_cost_usd: f64,
}

/// Estimate cost from token usage for a given model.
///
/// Returns None when the usage is absent or empty, or when the model has no
/// pricing entry, rather than a zero/garbage estimate.
#[must_use]
pub fn estimate_cost(
    usage: Option<&TokenUsage>,
    model: &str,
    table: &PricingTable,
) -> Option<CostEstimate> {
    let usage = usage.filter(|u| !u.is_empty())?;
    let pricing = table.get(model)?;

    let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * pricing.input_per_million;
    let output_cost = (usage.output_tokens as f64 / 1_000_000.0) * pricing.output_per_million;

    Some(CostEstimate {
        input_cost_usd: input_cost,
        output_cost_usd: output_cost,
        total_cost_usd: input_cost + output_cost,
    })
}
