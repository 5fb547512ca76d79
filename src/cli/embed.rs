//! CLI command: `tokentally embed`

use super::{ctrl_c_token, print_report, EmbedArgs};
use tokentally_llm::{Accounting, AiGateway, EmbeddingParams};

/// Run the embed subcommand.
pub async fn run(gateway: &AiGateway, args: EmbedArgs) -> anyhow::Result<()> {
    let params = EmbeddingParams::new(args.model.unwrap_or_default(), args.texts);
    let outcome = gateway
        .create_embeddings(params.into(), &ctrl_c_token())
        .await?;

    println!(
        "{} vector(s), {} dimensions ({})",
        outcome.response.data.len(),
        outcome.response.dimensions(),
        outcome.response.model
    );
    if let Accounting::Skipped(reason) = outcome.accounting {
        println!("usage not recorded: {reason:?}");
    }

    print_report(gateway).await;
    Ok(())
}
