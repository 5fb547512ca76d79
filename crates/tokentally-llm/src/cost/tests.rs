//! Tests for cost module

use super::*;
use crate::completion::TokenUsage;
use std::sync::Arc;

fn usage(prompt: u32, completion: u32, total: u32) -> TokenUsage {
    TokenUsage::new(prompt, completion, total)
}

#[test]
fn test_model_pricing_calculation() {
    let pricing = ModelPricing::new("test-model", 10.0, 20.0);

    // 1M tokens each
    let cost = pricing.calculate_cost(1_000_000, 1_000_000);
    assert!((cost - 30.0).abs() < 1e-9);

    // 1K tokens each
    let cost = pricing.calculate_cost(1_000, 1_000);
    assert!((cost - 0.03).abs() < 1e-9);
}

#[test]
fn test_default_pricing_has_common_models() {
    let table = PricingTable::default();

    let mini = table.price_for("gpt-4o-mini").expect("gpt-4o-mini priced");
    assert!((mini.prompt_cost_per_million - 0.150).abs() < 1e-12);
    assert!((mini.completion_cost_per_million - 0.60).abs() < 1e-12);

    let small = table
        .price_for("text-embedding-3-small")
        .expect("embedding model priced");
    assert!((small.prompt_cost_per_million - 0.02).abs() < 1e-12);
    assert_eq!(small.completion_cost_per_million, 0.0);

    assert!(table.price_for("gpt-5").is_some());
    assert!(table.price_for("no-such-model").is_none());
}

#[test]
fn test_pricing_overrides_replace_and_extend_defaults() {
    let table = PricingTable::with_overrides(vec![
        ModelPricing::new("gpt-4o-mini", 1.0, 2.0),
        ModelPricing::new("local-llama", 0.0, 0.0),
    ])
    .unwrap();

    let mini = table.price_for("gpt-4o-mini").unwrap();
    assert_eq!(mini.prompt_cost_per_million, 1.0);
    assert!(table.price_for("local-llama").is_some());
    assert_eq!(table.len(), PricingTable::default().len() + 1);
}

#[test]
fn test_pricing_overrides_reject_negative_prices() {
    let result = PricingTable::with_overrides(vec![ModelPricing::new("bad", -1.0, 0.0)]);
    assert!(matches!(result, Err(crate::Error::InvalidPricing(_))));

    let result = PricingTable::with_overrides(vec![ModelPricing::new("", 1.0, 0.0)]);
    assert!(result.is_err());
}

#[test]
fn test_totals_saturate_across_models() {
    let saturated = ModelUsage {
        prompt_tokens: u64::MAX,
        completion_tokens: u64::MAX - 1,
        total_tokens: u64::MAX,
        requests: 1,
    };

    let mut totals = UsageTotals::default();
    totals.absorb(&saturated, 1.5);
    totals.absorb(&saturated, 0.5);

    assert_eq!(totals.prompt_tokens, u64::MAX);
    assert_eq!(totals.completion_tokens, u64::MAX);
    assert_eq!(totals.total_tokens, u64::MAX);
    assert!((totals.cost - 2.0).abs() < 1e-12);
}

#[test]
fn test_pricing_entries_are_sorted() {
    let table = PricingTable::default();
    let names: Vec<_> = table.entries().iter().map(|p| p.model.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_add_accumulates_each_field_independently() {
    let acc = UsageAccumulator::new();
    let calls = [usage(10, 5, 15), usage(3, 0, 4), usage(7, 11, 18)];

    for u in calls {
        acc.add("gpt-4o-mini", u).await;
    }

    let entry = acc.usage_for("gpt-4o-mini").await.unwrap();
    assert_eq!(entry.prompt_tokens, 20);
    assert_eq!(entry.completion_tokens, 16);
    // Total is stored as reported, not derived from prompt + completion
    assert_eq!(entry.total_tokens, 37);
    assert_eq!(entry.requests, 3);

    let report = acc.report().await;
    assert_eq!(report.totals.prompt_tokens, 20);
    assert_eq!(report.totals.completion_tokens, 16);
    assert_eq!(report.totals.total_tokens, 37);
}

#[tokio::test]
async fn test_cost_for_unknown_model_is_zero() {
    let acc = UsageAccumulator::new();
    assert_eq!(acc.cost_for("gpt-4o-mini").await, 0.0);
    assert!(acc.usage_for("gpt-4o-mini").await.is_none());
}

#[tokio::test]
async fn test_cost_for_unpriced_model_is_zero() {
    let acc = UsageAccumulator::new();
    acc.add("my-finetune", usage(1_000_000, 1_000_000, 2_000_000))
        .await;

    assert_eq!(acc.cost_for("my-finetune").await, 0.0);
    assert_eq!(acc.usage_for("my-finetune").await.unwrap().prompt_tokens, 1_000_000);
}

#[tokio::test]
async fn test_cost_for_gpt_4o_mini_million_tokens() {
    let acc = UsageAccumulator::new();
    acc.add("gpt-4o-mini", usage(1_000_000, 1_000_000, 2_000_000))
        .await;

    let cost = acc.cost_for("gpt-4o-mini").await;
    assert!((cost - 0.750).abs() < 1e-12, "got {cost}");
}

#[tokio::test]
async fn test_cost_uses_injected_pricing() {
    let pricing = PricingTable::with_overrides(vec![ModelPricing::embedding("embed-x", 4.0)])
        .unwrap();
    let acc = UsageAccumulator::with_pricing(Arc::new(pricing));
    acc.add("embed-x", usage(500_000, 0, 500_000)).await;

    assert!((acc.cost_for("embed-x").await - 2.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_report_is_sorted_and_totals_match() {
    let acc = UsageAccumulator::new();
    acc.add("text-embedding-3-small", usage(2_000, 0, 2_000)).await;
    acc.add("gpt-4o", usage(1_000, 500, 1_500)).await;
    acc.add("gpt-4o-mini", usage(4_000, 1_000, 5_000)).await;
    acc.add("unpriced", usage(10, 10, 20)).await;

    let report = acc.report().await;
    let names: Vec<_> = report.models.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(
        names,
        vec!["gpt-4o", "gpt-4o-mini", "text-embedding-3-small", "unpriced"]
    );

    let sum: f64 = report.models.iter().map(|m| m.cost).sum();
    assert!((report.totals.cost - sum).abs() < 1e-12);
    assert_eq!(report.totals.prompt_tokens, 7_010);

    // Identical state yields an identical report
    assert_eq!(acc.report().await, report);
}

#[tokio::test]
async fn test_try_report_without_contention() {
    let acc = UsageAccumulator::new();
    acc.add("gpt-4o-mini", usage(1, 1, 2)).await;

    let report = acc.try_report().expect("lock is free");
    assert_eq!(report.models.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_lose_no_updates() {
    let acc = Arc::new(UsageAccumulator::new());

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let acc = Arc::clone(&acc);
            tokio::spawn(async move {
                for _ in 0..100 {
                    acc.add("gpt-4o-mini", usage(1, 0, 1)).await;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let entry = acc.usage_for("gpt-4o-mini").await.unwrap();
    assert_eq!(entry.prompt_tokens, 10_000);
    assert_eq!(entry.total_tokens, 10_000);
    assert_eq!(entry.requests, 10_000);
}

#[test]
fn test_format_report_blocks_and_totals() {
    let acc = UsageAccumulator::new();
    let report = tokio_test::block_on(async {
        acc.add("gpt-4o-mini", usage(1_000_000, 1_000_000, 2_000_000))
            .await;
        acc.report().await
    });

    let text = format_report(&report);
    assert!(text.contains("Model: gpt-4o-mini\n"));
    assert!(text.contains("Prompt Tokens: 1000000\n"));
    assert!(text.contains("Cost: $0.750000000\n"));
    assert!(text.contains("---\n"));
    assert!(text.ends_with("Total Cost: $0.750000000\n"));
    assert_eq!(report.to_string(), text);
}

#[test]
fn test_format_empty_report() {
    let text = format_report(&UsageReport::default());
    assert!(!text.contains("Model:"));
    assert!(text.contains("Total Tokens: 0\n"));
    assert!(text.contains("Total Cost: $0.000000000\n"));
}
