//! Usage counters
//!
//! This module contains the per-model counters the accumulator keeps.

use crate::completion::TokenUsage;
use serde::{Deserialize, Serialize};

/// Accumulated usage for one model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Total prompt tokens
    pub prompt_tokens: u64,
    /// Total completion tokens
    pub completion_tokens: u64,
    /// Total tokens as reported by the provider (not derived)
    pub total_tokens: u64,
    /// Number of usage reports folded in
    pub requests: u64,
}

impl ModelUsage {
    /// Fold one usage report into the counters
    pub(crate) fn absorb(&mut self, usage: &TokenUsage) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(usage.prompt_tokens.into());
        self.completion_tokens = self
            .completion_tokens
            .saturating_add(usage.completion_tokens.into());
        self.total_tokens = self.total_tokens.saturating_add(usage.total_tokens.into());
        self.requests = self.requests.saturating_add(1);
    }
}

/// Grand totals across all models
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Total prompt tokens
    pub prompt_tokens: u64,
    /// Total completion tokens
    pub completion_tokens: u64,
    /// Total tokens
    pub total_tokens: u64,
    /// Total estimated cost (USD)
    pub cost: f64,
}

impl UsageTotals {
    /// Add one model's counters and cost to the totals
    pub(crate) fn absorb(&mut self, usage: &ModelUsage, cost: f64) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(usage.prompt_tokens);
        self.completion_tokens = self
            .completion_tokens
            .saturating_add(usage.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(usage.total_tokens);
        self.cost += cost;
    }
}
