//! Cost Tracking - LLM usage and cost reporting
//!
//! # Module Structure
//!
//! - `pricing`: Model pricing table and defaults
//! - `record`: Per-model usage counters and totals
//! - `tracker`: UsageAccumulator implementation
//! - `report`: Usage reports and console rendering

mod pricing;
mod record;
mod report;
mod tracker;

#[cfg(test)]
mod tests;

pub use pricing::{default_pricing, ModelPricing, PricingTable};
pub use record::{ModelUsage, UsageTotals};
pub use report::{format_report, ModelReport, UsageReport};
pub use tracker::UsageAccumulator;
