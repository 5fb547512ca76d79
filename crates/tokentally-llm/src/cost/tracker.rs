//! Usage Accumulator - per-model token tally
//!
//! This module contains the UsageAccumulator shared by every gateway call.

use super::pricing::PricingTable;
use super::record::{ModelUsage, UsageTotals};
use super::report::{ModelReport, UsageReport};
use crate::completion::TokenUsage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Accumulated token counts per model, priced against a shared table
#[derive(Debug)]
pub struct UsageAccumulator {
    /// Pricing information (read-only)
    pricing: Arc<PricingTable>,
    /// Counters keyed by model, ordered for reporting
    usage: RwLock<BTreeMap<String, ModelUsage>>,
}

impl Default for UsageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageAccumulator {
    /// Create an accumulator with default pricing
    #[must_use]
    pub fn new() -> Self {
        Self::with_pricing(Arc::new(PricingTable::default()))
    }

    /// Create an accumulator priced against the given table
    #[must_use]
    pub fn with_pricing(pricing: Arc<PricingTable>) -> Self {
        Self {
            pricing,
            usage: RwLock::new(BTreeMap::new()),
        }
    }

    /// Pricing table used for cost derivation
    #[must_use]
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Add one usage report to `model`'s counters
    pub async fn add(&self, model: &str, usage: TokenUsage) {
        let mut entries = self.usage.write().await;
        entries.entry(model.to_string()).or_default().absorb(&usage);
        debug!(
            model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Usage recorded"
        );
    }

    /// Counters for a model, if it has been seen
    pub async fn usage_for(&self, model: &str) -> Option<ModelUsage> {
        self.usage.read().await.get(model).copied()
    }

    /// Estimated cost (USD) accumulated for a model
    ///
    /// Zero when the model has no usage or no pricing entry.
    pub async fn cost_for(&self, model: &str) -> f64 {
        let entries = self.usage.read().await;
        entries
            .get(model)
            .map_or(0.0, |usage| self.price(model, usage))
    }

    /// Snapshot report, ordered by model identifier
    pub async fn report(&self) -> UsageReport {
        let entries = self.usage.read().await;
        self.build_report(&entries)
    }

    /// Non-blocking report snapshot.
    /// Returns `None` if a writer holds the lock.
    #[must_use]
    pub fn try_report(&self) -> Option<UsageReport> {
        let entries = self.usage.try_read().ok()?;
        Some(self.build_report(&entries))
    }

    fn price(&self, model: &str, usage: &ModelUsage) -> f64 {
        self.pricing
            .price_for(model)
            .map_or(0.0, |p| p.calculate_cost(usage.prompt_tokens, usage.completion_tokens))
    }

    fn build_report(&self, entries: &BTreeMap<String, ModelUsage>) -> UsageReport {
        let mut totals = UsageTotals::default();
        let models = entries
            .iter()
            .map(|(model, usage)| {
                let cost = self.price(model, usage);
                totals.absorb(usage, cost);
                ModelReport {
                    model: model.clone(),
                    usage: *usage,
                    cost,
                }
            })
            .collect();

        UsageReport { models, totals }
    }
}
