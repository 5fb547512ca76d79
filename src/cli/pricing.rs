//! CLI command: `tokentally pricing`

use crate::config::AppConfig;

/// Run the pricing subcommand.
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let table = config.pricing_table()?;

    println!();
    println!("  Pricing (USD per 1M tokens)");
    println!("  {}", "-".repeat(60));
    println!("  {:<32} {:>12} {:>12}", "Model", "Prompt", "Completion");
    println!("  {}", "-".repeat(60));
    for entry in table.entries() {
        println!(
            "  {:<32} {:>12.3} {:>12.3}",
            entry.model, entry.prompt_cost_per_million, entry.completion_cost_per_million
        );
    }
    println!();

    Ok(())
}
