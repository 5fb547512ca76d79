//! Embedding request and response types
//!
//! An embedding call accepts either a request whose model the gateway knows
//! (`EmbeddingRequest::Model`) or a pre-built provider body it passes through
//! untouched (`EmbeddingRequest::Raw`). Only the former can be billed.

use crate::completion::TokenUsage;
use serde::{Deserialize, Serialize};

/// Embedding request with a single known model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingParams {
    /// Model to use; empty means the gateway's default embedding model
    pub model: String,
    /// Texts to embed
    pub input: Vec<String>,
    /// Requested output dimensions (models that support it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl EmbeddingParams {
    /// Create params for the given model and inputs
    #[must_use]
    pub fn new(model: impl Into<String>, input: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input,
            dimensions: None,
        }
    }
}

/// Embedding request variants accepted by the gateway
#[derive(Debug, Clone)]
pub enum EmbeddingRequest {
    /// Request whose model identifier is known to the gateway
    Model(EmbeddingParams),
    /// Provider-shaped JSON body; the gateway does not interpret it
    Raw(serde_json::Value),
}

impl From<EmbeddingParams> for EmbeddingRequest {
    fn from(params: EmbeddingParams) -> Self {
        Self::Model(params)
    }
}

/// One embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// Position of the input this vector belongs to
    pub index: u32,
    /// Vector values
    pub embedding: Vec<f32>,
}

/// Embedding response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Model reported by the provider
    pub model: String,
    /// Vectors in input order
    pub data: Vec<EmbeddingVector>,
    /// Usage (embedding models report no completion tokens)
    pub usage: TokenUsage,
}

impl EmbeddingResponse {
    /// Dimensions of the first vector, 0 when empty
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.data.first().map_or(0, |v| v.embedding.len())
    }
}
