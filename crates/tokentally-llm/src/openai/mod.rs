//! OpenAI - async-openai provider
//!
//! This module implements the provider client on top of async-openai 0.32+.

use crate::completion::{
    ChatChoice, ChatChunk, ChatRequest, ChatResponse, ChunkChoice, ChunkDelta, TokenUsage,
};
use crate::embedding::{EmbeddingRequest, EmbeddingResponse, EmbeddingVector};
use crate::error::{Error, Result, Stage};
use crate::message::{Message, MessageRole};
use crate::provider::{ChatStream, LlmProvider};
use crate::util::{mask_api_key, sanitize_api_error};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
        CreateChatCompletionRequest,
    },
    types::embeddings::{CreateEmbeddingRequest, CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
use futures::StreamExt;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the OpenAI provider
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Optional custom base URL (for Azure OpenAI or proxies)
    pub base_url: Option<String>,
    /// Optional organization ID
    pub org_id: Option<String>,
    /// Default model reported by the provider
    pub default_model: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("org_id", &self.org_id.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            org_id: None,
            default_model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    /// (`OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_ORG_ID`, `OPENAI_MODEL`).
    ///
    /// # Errors
    /// Returns error if `OPENAI_API_KEY` is not set
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            org_id: std::env::var("OPENAI_ORG_ID").ok(),
            default_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sets a custom base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the organization ID
    #[must_use]
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Sets the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI API provider for chat completions and embeddings
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    default_model: String,
}

impl OpenAiProvider {
    /// Creates a new provider with the given configuration
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        if let Some(org_id) = &config.org_id {
            openai_config = openai_config.with_org_id(org_id);
        }

        // The default async-openai client uses reqwest::Client::new() which has no timeout.
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // Bound the client's internal backoff by the request timeout.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(config.timeout),
            ..Default::default()
        };

        let client = Client::build(http_client, openai_config, backoff);

        Self {
            client,
            default_model: config.default_model,
        }
    }

    /// Creates a provider from environment variables
    ///
    /// # Errors
    /// Returns error if `OPENAI_API_KEY` is not set
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Ok(Self::new(config))
    }

    fn convert_message(msg: Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content),
                name: msg.name,
            }
            .into(),
            MessageRole::User => ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content),
                name: msg.name,
            }
            .into(),
            MessageRole::Assistant =>
            {
                #[allow(deprecated)]
                ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content,
                    )),
                    name: msg.name,
                    tool_calls: None,
                    function_call: None,
                    refusal: None,
                    audio: None,
                }
                .into()
            }
        }
    }

    fn build_chat_request(request: ChatRequest, stream: bool) -> CreateChatCompletionRequest {
        let include_usage = request.include_usage;
        let messages = request
            .messages
            .into_iter()
            .map(Self::convert_message)
            .collect();

        let mut openai_request = CreateChatCompletionRequest {
            model: request.model,
            messages,
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature,
            ..Default::default()
        };

        if stream {
            openai_request.stream = Some(true);
            if include_usage {
                openai_request.stream_options = Some(ChatCompletionStreamOptions {
                    include_usage: Some(true),
                    include_obfuscation: None,
                });
            }
        }

        openai_request
    }

    fn build_embedding_request(request: EmbeddingRequest) -> Result<CreateEmbeddingRequest> {
        match request {
            EmbeddingRequest::Model(params) => {
                let mut args = CreateEmbeddingRequestArgs::default();
                args.model(params.model)
                    .input(EmbeddingInput::StringArray(params.input));
                if let Some(dimensions) = params.dimensions {
                    args.dimensions(dimensions);
                }
                args.build()
                    .map_err(|e| Error::InvalidRequest(e.to_string()))
            }
            EmbeddingRequest::Raw(body) => serde_json::from_value(body)
                .map_err(|e| Error::InvalidRequest(format!("embedding body: {e}"))),
        }
    }

    fn api_error(stage: Stage) -> impl Fn(OpenAIError) -> Error {
        move |e| Error::provider(stage, sanitize_api_error(&e.to_string()))
    }
}

/// Lowercase wire name of a serde enum (`Role::Assistant` -> "assistant")
fn wire_name<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

fn parse_role<T: Serialize>(role: &T) -> Option<MessageRole> {
    serde_json::to_value(role)
        .ok()
        .and_then(|v| serde_json::from_value(v).ok())
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let openai_request = Self::build_chat_request(request, false);

        debug!("Sending chat request to OpenAI");

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(Self::api_error(Stage::ChatCompletion))?;

        let choices = response
            .choices
            .into_iter()
            .map(|choice| ChatChoice {
                index: choice.index,
                message: Message {
                    role: parse_role(&choice.message.role).unwrap_or(MessageRole::Assistant),
                    content: choice.message.content.unwrap_or_default(),
                    name: None,
                },
                finish_reason: choice.finish_reason.as_ref().and_then(wire_name),
            })
            .collect();

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            model: response.model,
            choices,
            usage,
        })
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        let openai_request = Self::build_chat_request(request, true);

        debug!("Opening chat stream to OpenAI");

        let stream = self
            .client
            .chat()
            .create_stream(openai_request)
            .await
            .map_err(Self::api_error(Stage::ChatCompletionStream))?;

        let chunks = stream.map(|item| -> Result<ChatChunk> {
            let chunk = item.map_err(Self::api_error(Stage::ChatCompletionStream))?;
            let choices = chunk
                .choices
                .into_iter()
                .map(|choice| ChunkChoice {
                    index: choice.index,
                    delta: ChunkDelta {
                        role: choice.delta.role.as_ref().and_then(parse_role),
                        content: choice.delta.content,
                    },
                    finish_reason: choice.finish_reason.as_ref().and_then(wire_name),
                })
                .collect();

            Ok(ChatChunk {
                model: chunk.model,
                choices,
                usage: chunk.usage.map(|u| TokenUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                }),
            })
        });

        Ok(chunks.boxed())
    }

    #[instrument(skip(self, request))]
    async fn embeddings(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let openai_request = Self::build_embedding_request(request)?;

        debug!(model = %openai_request.model, "Sending embedding request to OpenAI");

        let response = self
            .client
            .embeddings()
            .create(openai_request)
            .await
            .map_err(Self::api_error(Stage::Embeddings))?;

        Ok(EmbeddingResponse {
            model: response.model,
            data: response
                .data
                .into_iter()
                .map(|e| EmbeddingVector {
                    index: e.index,
                    embedding: e.embedding,
                })
                .collect(),
            usage: TokenUsage {
                prompt_tokens: response.usage.prompt_tokens,
                completion_tokens: 0,
                total_tokens: response.usage.total_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests;
