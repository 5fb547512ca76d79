//! Mock LLM Provider for testing
//!
//! This module provides a scripted provider: responses, streams and errors
//! are queued up front and handed out in order. Every request is recorded.

use super::{ChatStream, LlmProvider};
use crate::completion::{ChatChoice, ChatChunk, ChatRequest, ChatResponse};
use crate::embedding::{EmbeddingRequest, EmbeddingResponse};
use crate::error::{Error, Result, Stage};
use crate::message::Message;
use futures::stream::{self, StreamExt};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ScriptedStream {
    items: Vec<Result<ChatChunk>>,
    hang: bool,
}

#[derive(Default)]
struct Script {
    chats: VecDeque<Result<ChatResponse>>,
    streams: VecDeque<Result<ScriptedStream>>,
    embeddings: VecDeque<Result<EmbeddingResponse>>,
    chat_requests: Vec<ChatRequest>,
    embedding_requests: Vec<EmbeddingRequest>,
}

/// A mock LLM provider that returns queued responses or default ones.
#[derive(Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<Script>>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before answering
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a chat response.
    pub fn add_chat_response(&self, response: ChatResponse) {
        self.script().chats.push_back(Ok(response));
    }

    /// Queue a chat failure.
    pub fn add_chat_error(&self, message: impl Into<String>) {
        self.script()
            .chats
            .push_back(Err(Error::provider(Stage::ChatCompletion, message)));
    }

    /// Queue a stream that yields `items` and then ends.
    pub fn add_stream(&self, items: Vec<Result<ChatChunk>>) {
        self.script()
            .streams
            .push_back(Ok(ScriptedStream { items, hang: false }));
    }

    /// Queue a stream that yields `items` and then never ends.
    pub fn add_stream_then_hang(&self, items: Vec<Result<ChatChunk>>) {
        self.script()
            .streams
            .push_back(Ok(ScriptedStream { items, hang: true }));
    }

    /// Queue a failure to open a stream.
    pub fn add_stream_error(&self, message: impl Into<String>) {
        self.script()
            .streams
            .push_back(Err(Error::provider(Stage::ChatCompletionStream, message)));
    }

    /// Queue an embedding response.
    pub fn add_embedding_response(&self, response: EmbeddingResponse) {
        self.script().embeddings.push_back(Ok(response));
    }

    /// Queue an embedding failure.
    pub fn add_embedding_error(&self, message: impl Into<String>) {
        self.script()
            .embeddings
            .push_back(Err(Error::provider(Stage::Embeddings, message)));
    }

    /// Chat requests received so far (streaming included).
    #[must_use]
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.script().chat_requests.clone()
    }

    /// Embedding requests received so far.
    #[must_use]
    pub fn embedding_requests(&self) -> Vec<EmbeddingRequest> {
        self.script().embedding_requests.clone()
    }

    async fn wait(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();
        let queued = {
            let mut script = self.script();
            script.chat_requests.push(request);
            script.chats.pop_front()
        };
        self.wait().await;

        queued.unwrap_or_else(|| {
            Ok(ChatResponse {
                model,
                choices: vec![ChatChoice {
                    index: 0,
                    message: Message::assistant("mock response"),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        let queued = {
            let mut script = self.script();
            script.chat_requests.push(request);
            script.streams.pop_front()
        };
        self.wait().await;

        let scripted = match queued {
            Some(scripted) => scripted?,
            None => ScriptedStream {
                items: Vec::new(),
                hang: false,
            },
        };

        let items = stream::iter(scripted.items);
        if scripted.hang {
            Ok(items.chain(stream::pending()).boxed())
        } else {
            Ok(items.boxed())
        }
    }

    async fn embeddings(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let queued = {
            let mut script = self.script();
            script.embedding_requests.push(request);
            script.embeddings.pop_front()
        };
        self.wait().await;

        queued.unwrap_or_else(|| {
            Err(Error::InvalidResponse(
                "no embedding response queued".to_string(),
            ))
        })
    }
}
