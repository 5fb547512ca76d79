//! LLM Provider trait definition
//!
//! The provider client is the external collaborator the gateway wraps: it
//! accepts a request object and returns a response, a chunk stream or an
//! error. Transport, authentication and retries live behind this trait.

mod mock;

use crate::completion::{ChatChunk, ChatRequest, ChatResponse};
use crate::embedding::{EmbeddingRequest, EmbeddingResponse};
use crate::error::Result;
use futures::stream::BoxStream;

pub use mock::MockProvider;

/// Ordered stream of chat chunks; ends when the provider signals end-of-stream
pub type ChatStream = BoxStream<'static, Result<ChatChunk>>;

/// Trait for LLM providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Run a chat completion
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Open a streamed chat completion
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream>;

    /// Create embeddings
    async fn embeddings(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;
}
