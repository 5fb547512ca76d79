//! Cost Reporting
//!
//! This module contains the usage report and its console rendering.

use super::record::{ModelUsage, UsageTotals};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Usage and cost for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Model name
    pub model: String,
    /// Accumulated counters
    pub usage: ModelUsage,
    /// Estimated cost (USD)
    pub cost: f64,
}

/// Usage report across all tracked models
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Per-model entries, ordered by model name
    pub models: Vec<ModelReport>,
    /// Grand totals
    pub totals: UsageTotals,
}

impl UsageReport {
    /// Whether no usage has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_report(self))
    }
}

/// Format report as text: one block per model, then grand totals
#[must_use]
pub fn format_report(report: &UsageReport) -> String {
    let mut output = String::new();

    for entry in &report.models {
        output.push_str(&format!("Model: {}\n", entry.model));
        output.push_str(&format!("Prompt Tokens: {}\n", entry.usage.prompt_tokens));
        output.push_str(&format!(
            "Completion Tokens: {}\n",
            entry.usage.completion_tokens
        ));
        output.push_str(&format!("Total Tokens: {}\n", entry.usage.total_tokens));
        output.push_str(&format!("Cost: ${:.9}\n", entry.cost));
        output.push_str("---\n");
    }

    let totals = &report.totals;
    output.push_str(&format!("Total Prompt Tokens: {}\n", totals.prompt_tokens));
    output.push_str(&format!(
        "Total Completion Tokens: {}\n",
        totals.completion_tokens
    ));
    output.push_str(&format!("Total Tokens: {}\n", totals.total_tokens));
    output.push_str(&format!("Total Cost: ${:.9}\n", totals.cost));

    output
}
