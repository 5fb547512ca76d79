//! Error types for tokentally-llm

use std::fmt;
use thiserror::Error;

/// The gateway operation an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Non-streaming chat completion
    ChatCompletion,
    /// Streaming chat completion
    ChatCompletionStream,
    /// Embeddings
    Embeddings,
}

impl Stage {
    /// Returns the prefix used when rendering errors from this stage
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatCompletion => "chat completion",
            Self::ChatCompletionStream => "chat completion stream",
            Self::Embeddings => "embeddings",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LLM accounting error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider call failed (including mid-stream read failures)
    #[error("{stage} error: {message}")]
    Provider {
        /// Operation that failed
        stage: Stage,
        /// Sanitised provider message
        message: String,
    },

    /// Caller cancelled the request before it completed
    #[error("{0} cancelled")]
    Cancelled(Stage),

    /// Request log could not be written
    #[error("log write failed: {0}")]
    LogWrite(String),

    /// Pricing configuration rejected
    #[error("invalid pricing: {0}")]
    InvalidPricing(String),

    /// Provider not configured
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Request could not be translated for the provider
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Wrap a provider failure with the stage it happened in
    #[must_use]
    pub fn provider(stage: Stage, message: impl Into<String>) -> Self {
        Self::Provider {
            stage,
            message: message.into(),
        }
    }

    /// Attribute an error returned by the provider client to a gateway stage
    #[must_use]
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            Self::Provider { message, .. } => Self::Provider { stage, message },
            Self::Cancelled(_) => Self::Cancelled(stage),
            other => Self::Provider {
                stage,
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
