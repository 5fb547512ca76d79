//! Application configuration types

mod loader;

pub use loader::load_config;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokentally_llm::{GatewayConfig, ModelPricing, OpenAiConfig, PricingTable};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub pricing: Vec<PriceOverride>,
}

/// Gateway section
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    pub default_model: String,
    pub default_embedding_model: String,
    #[serde(default)]
    pub enable_logging: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

/// OpenAI section; the API key always comes from `OPENAI_API_KEY`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            org_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One `[[pricing]]` entry (USD per 1M tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct PriceOverride {
    pub model: String,
    pub prompt: f64,
    #[serde(default)]
    pub completion: f64,
}

impl AppConfig {
    /// Gateway configuration, with `--log` forcing the request log on
    pub fn gateway_config(&self, force_logging: bool) -> Result<GatewayConfig> {
        let config = GatewayConfig {
            default_model: self.gateway.default_model.clone(),
            default_embedding_model: self.gateway.default_embedding_model.clone(),
            enable_logging: self.gateway.enable_logging || force_logging,
            log_dir: self.gateway.log_dir.clone(),
        };
        config.validate().context("Invalid [gateway] section")?;
        Ok(config)
    }

    /// Built-in prices with configured overrides applied
    pub fn pricing_table(&self) -> Result<PricingTable> {
        let overrides = self
            .pricing
            .iter()
            .map(|p| ModelPricing::new(p.model.clone(), p.prompt, p.completion));
        PricingTable::with_overrides(overrides).context("Invalid [[pricing]] entry")
    }

    /// OpenAI client configuration (API key from the environment)
    pub fn openai_config(&self) -> Result<OpenAiConfig> {
        let mut config = OpenAiConfig::from_env()
            .context("OpenAI provider is not configured")?
            .with_model(self.gateway.default_model.clone())
            .with_timeout(Duration::from_secs(self.openai.timeout_secs));

        if let Some(base_url) = &self.openai.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(org_id) = &self.openai.org_id {
            config = config.with_org_id(org_id.clone());
        }
        Ok(config)
    }
}
