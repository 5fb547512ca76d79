//! CLI module for Tokentally
//!
//! Provides commands:
//! - `chat`: One chat completion (optionally streamed), then the usage report
//! - `embed`: One embedding call, then the usage report
//! - `pricing`: Effective pricing table

use crate::config::{load_config, AppConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokentally_llm::{AiGateway, OpenAiProvider, UsageAccumulator};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub mod chat;
pub mod embed;
pub mod pricing;

/// Tokentally CLI
#[derive(Parser, Debug)]
#[command(name = "tokentally")]
#[command(about = "Usage-accounted LLM calls with running cost estimates")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write request/response records to the log file
    #[arg(long, global = true)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one chat completion
    Chat(ChatArgs),
    /// Create embeddings for the given texts
    Embed(EmbedArgs),
    /// Show the effective pricing table
    Pricing,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// User prompt
    pub prompt: String,
    /// Model (defaults to gateway.default_model)
    #[arg(long)]
    pub model: Option<String>,
    /// System prompt
    #[arg(long)]
    pub system: Option<String>,
    /// Stream the response
    #[arg(long)]
    pub stream: bool,
}

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Texts to embed
    #[arg(required = true)]
    pub texts: Vec<String>,
    /// Model (defaults to gateway.default_embedding_model)
    #[arg(long)]
    pub model: Option<String>,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Chat(args)) => chat::run(&build_gateway(&config, cli.log)?, args).await,
        Some(Commands::Embed(args)) => embed::run(&build_gateway(&config, cli.log)?, args).await,
        Some(Commands::Pricing) => pricing::run(&config),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn build_gateway(config: &AppConfig, force_logging: bool) -> anyhow::Result<AiGateway> {
    let provider = OpenAiProvider::new(config.openai_config()?);
    let usage = UsageAccumulator::with_pricing(Arc::new(config.pricing_table()?));

    let gateway_config = config.gateway_config(force_logging)?;
    Ok(AiGateway::new(Arc::new(provider), Arc::new(usage), gateway_config)?)
}

/// Token cancelled on Ctrl-C
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling request");
            trigger.cancel();
        }
    });
    cancel
}

/// Print the accumulated usage report
pub(crate) async fn print_report(gateway: &AiGateway) {
    println!();
    print!("{}", gateway.report().await);
}
