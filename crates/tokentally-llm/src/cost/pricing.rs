//! Model Pricing - LLM cost information
//!
//! Static per-million-token prices, loaded once and read-only afterwards.
//! Models without an entry are not billed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Model Pricing Constants (per 1M tokens, USD)
// ============================================================================

// OpenAI GPT-4o family
/// GPT-4o-mini prompt cost per 1M tokens
pub const GPT4O_MINI_PROMPT_COST: f64 = 0.150;
/// GPT-4o-mini completion cost per 1M tokens
pub const GPT4O_MINI_COMPLETION_COST: f64 = 0.60;
/// GPT-4o prompt cost per 1M tokens
pub const GPT4O_PROMPT_COST: f64 = 2.50;
/// GPT-4o completion cost per 1M tokens
pub const GPT4O_COMPLETION_COST: f64 = 10.00;

// OpenAI GPT-4.1 family
/// GPT-4.1 prompt cost per 1M tokens
pub const GPT41_PROMPT_COST: f64 = 2.00;
/// GPT-4.1 completion cost per 1M tokens
pub const GPT41_COMPLETION_COST: f64 = 8.00;
/// GPT-4.1-mini prompt cost per 1M tokens
pub const GPT41_MINI_PROMPT_COST: f64 = 0.40;
/// GPT-4.1-mini completion cost per 1M tokens
pub const GPT41_MINI_COMPLETION_COST: f64 = 1.60;

// OpenAI GPT-5 family
/// GPT-5 nano prompt cost per 1M tokens
pub const GPT5_NANO_PROMPT_COST: f64 = 0.05;
/// GPT-5 nano completion cost per 1M tokens
pub const GPT5_NANO_COMPLETION_COST: f64 = 0.40;
/// GPT-5 prompt cost per 1M tokens
pub const GPT5_PROMPT_COST: f64 = 1.25;
/// GPT-5 completion cost per 1M tokens
pub const GPT5_COMPLETION_COST: f64 = 10.00;

// OpenAI embeddings (prompt only)
/// text-embedding-3-small cost per 1M tokens
pub const EMBEDDING_3_SMALL_COST: f64 = 0.02;
/// text-embedding-3-large cost per 1M tokens
pub const EMBEDDING_3_LARGE_COST: f64 = 0.13;
/// text-embedding-ada-002 cost per 1M tokens
pub const EMBEDDING_ADA_002_COST: f64 = 0.10;

// ============================================================================
// Cost Models
// ============================================================================

/// Pricing information for a model (per 1M tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Model name
    pub model: String,
    /// Cost per 1M prompt tokens (USD)
    pub prompt_cost_per_million: f64,
    /// Cost per 1M completion tokens (USD); 0 for embedding models
    #[serde(default)]
    pub completion_cost_per_million: f64,
}

impl ModelPricing {
    /// Pricing for a chat model
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: f64, completion: f64) -> Self {
        Self {
            model: model.into(),
            prompt_cost_per_million: prompt,
            completion_cost_per_million: completion,
        }
    }

    /// Pricing for an embedding-only model
    #[must_use]
    pub fn embedding(model: impl Into<String>, prompt: f64) -> Self {
        Self::new(model, prompt, 0.0)
    }

    /// Calculate cost for given token counts
    #[must_use]
    pub fn calculate_cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        let prompt_cost = prompt_tokens as f64 * self.prompt_cost_per_million / 1_000_000.0;
        let completion_cost =
            completion_tokens as f64 * self.completion_cost_per_million / 1_000_000.0;
        prompt_cost + completion_cost
    }

    fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(Error::InvalidPricing("model name is empty".to_string()));
        }
        let prices = [self.prompt_cost_per_million, self.completion_cost_per_million];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(Error::InvalidPricing(format!(
                "{}: prices must be finite and non-negative",
                self.model
            )));
        }
        Ok(())
    }
}

/// Default pricing for common models
#[must_use]
pub fn default_pricing() -> Vec<ModelPricing> {
    vec![
        ModelPricing::new("gpt-4o-mini", GPT4O_MINI_PROMPT_COST, GPT4O_MINI_COMPLETION_COST),
        ModelPricing::new("gpt-4o", GPT4O_PROMPT_COST, GPT4O_COMPLETION_COST),
        ModelPricing::new("gpt-4.1", GPT41_PROMPT_COST, GPT41_COMPLETION_COST),
        ModelPricing::new("gpt-4.1-mini", GPT41_MINI_PROMPT_COST, GPT41_MINI_COMPLETION_COST),
        ModelPricing::new("gpt-5-nano", GPT5_NANO_PROMPT_COST, GPT5_NANO_COMPLETION_COST),
        ModelPricing::new("gpt-5", GPT5_PROMPT_COST, GPT5_COMPLETION_COST),
        ModelPricing::embedding("text-embedding-3-small", EMBEDDING_3_SMALL_COST),
        ModelPricing::embedding("text-embedding-3-large", EMBEDDING_3_LARGE_COST),
        ModelPricing::embedding("text-embedding-ada-002", EMBEDDING_ADA_002_COST),
    ]
}

/// Read-only lookup from model identifier to pricing
#[derive(Debug, Clone)]
pub struct PricingTable {
    entries: HashMap<String, ModelPricing>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::from_entries(default_pricing())
    }
}

impl PricingTable {
    /// Table with no entries; every model costs nothing
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn from_entries(entries: impl IntoIterator<Item = ModelPricing>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|p| (p.model.clone(), p))
                .collect(),
        }
    }

    /// Default table with configured entries layered on top
    ///
    /// # Errors
    /// Returns `Error::InvalidPricing` for empty model names or negative prices
    pub fn with_overrides(overrides: impl IntoIterator<Item = ModelPricing>) -> Result<Self> {
        let mut table = Self::default();
        for pricing in overrides {
            pricing.validate()?;
            table.entries.insert(pricing.model.clone(), pricing);
        }
        Ok(table)
    }

    /// Pricing for a model, `None` when the model is unknown
    #[must_use]
    pub fn price_for(&self, model: &str) -> Option<&ModelPricing> {
        self.entries.get(model)
    }

    /// All entries sorted by model name
    #[must_use]
    pub fn entries(&self) -> Vec<&ModelPricing> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.model.cmp(&b.model));
        entries
    }

    /// Number of priced models
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
