//! Gateway - accounted access to an LLM provider
//!
//! `AiGateway` sits between callers and a provider client. Each call
//! resolves the model, forwards the request, and on success feeds the
//! reported usage into the shared `UsageAccumulator` under the resolved
//! model name. Failures are returned with a stage prefix and record nothing.
//!
//! # Module Structure
//!
//! - `stream`: Reassembly of streamed deltas
//! - `log`: Optional request/response log file

mod log;
mod stream;


pub use log::{RequestLog, RECORD_MARKER};
pub use stream::{StreamAssembler, MAX_STREAM_CHOICES};

use crate::completion::{ChatChoice, ChatChunk, ChatRequest, ChatResponse};
use crate::cost::{UsageAccumulator, UsageReport};
use crate::embedding::{EmbeddingRequest, EmbeddingResponse};
use crate::error::{Error, Result, Stage};
use crate::message::Message;
use crate::provider::LlmProvider;
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default chat model used when a request leaves the model empty
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default embedding model used when a request leaves the model empty
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Model substituted for an empty chat model
    pub default_model: String,
    /// Model substituted for an empty embedding model
    pub default_embedding_model: String,
    /// Write request/response records to a log file
    pub enable_logging: bool,
    /// Directory for the log file
    pub log_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_CHAT_MODEL.to_string(),
            default_embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            enable_logging: false,
            log_dir: PathBuf::from("."),
        }
    }
}

impl GatewayConfig {
    /// Check that both fallback models name a model
    ///
    /// # Errors
    /// Returns `Error::NotConfigured` when a default model is blank.
    pub fn validate(&self) -> Result<()> {
        if self.default_model.trim().is_empty() {
            return Err(Error::NotConfigured("default chat model is empty".to_string()));
        }
        if self.default_embedding_model.trim().is_empty() {
            return Err(Error::NotConfigured(
                "default embedding model is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why an embedding call was not billed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Request variant does not name a single known model
    UnrecognizedVariant,
}

/// Whether an embedding call's usage reached the accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accounting {
    /// Usage recorded under `model`
    Recorded {
        /// Model the usage was recorded under
        model: String,
    },
    /// Usage not recorded
    Skipped(SkipReason),
}

/// Result of an embedding call
#[derive(Debug, Clone)]
pub struct EmbeddingOutcome {
    /// Provider response
    pub response: EmbeddingResponse,
    /// Accounting decision
    pub accounting: Accounting,
}

/// Usage-accounting wrapper around an LLM provider
pub struct AiGateway {
    provider: Arc<dyn LlmProvider>,
    usage: Arc<UsageAccumulator>,
    config: GatewayConfig,
    log: Option<RequestLog>,
}

impl AiGateway {
    /// Create a gateway over `provider`, recording into `usage`
    ///
    /// # Errors
    /// Returns `Error::NotConfigured` if `config` fails validation.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        usage: Arc<UsageAccumulator>,
        config: GatewayConfig,
    ) -> Result<Self> {
        config.validate()?;

        let log = config
            .enable_logging
            .then(|| RequestLog::new(config.log_dir.clone()));

        info!(
            provider = provider.name(),
            default_model = %config.default_model,
            logging = config.enable_logging,
            "Gateway initialized"
        );

        Ok(Self {
            provider,
            usage,
            config,
            log,
        })
    }

    /// Shared usage accumulator
    #[must_use]
    pub fn usage(&self) -> &Arc<UsageAccumulator> {
        &self.usage
    }

    /// Current usage report
    pub async fn report(&self) -> UsageReport {
        self.usage.report().await
    }

    /// Gateway configuration
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Request log, when logging is enabled
    #[must_use]
    pub fn request_log(&self) -> Option<&RequestLog> {
        self.log.as_ref()
    }

    fn resolve_model(&self, requested: &str) -> String {
        if requested.is_empty() {
            self.config.default_model.clone()
        } else {
            if requested != self.config.default_model {
                info!(model = requested, "Custom model requested");
            }
            requested.to_string()
        }
    }

    /// Run a chat completion and record its usage
    ///
    /// # Errors
    /// Returns the provider failure prefixed with the chat completion stage,
    /// or `Error::Cancelled` if `cancel` fires first. No usage is recorded in
    /// either case.
    pub async fn create_chat_completion(
        &self,
        mut request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let stage = Stage::ChatCompletion;
        request.model = self.resolve_model(&request.model);
        let model = request.model.clone();
        let logged_messages = self.log.as_ref().map(|_| request.messages.clone());

        debug!(model = %model, "Chat completion");

        let response = cancellable(stage, cancel, self.provider.chat(request))
            .await
            .map_err(|e| e.at_stage(stage))?;

        match response.usage {
            Some(usage) => self.usage.add(&model, usage).await,
            None => warn!(model = %model, "Chat response carried no usage"),
        }

        self.log_exchange(logged_messages, &response.choices).await;

        Ok(response)
    }

    /// Run a streamed chat completion
    ///
    /// Every chunk is sent to `sink` in arrival order before the next one is
    /// read, so a full channel pauses the stream. Usage from the terminal
    /// chunk is recorded once. If the receiver goes away the stream is still
    /// drained for its usage.
    ///
    /// # Errors
    /// Returns the provider failure prefixed with the stream stage (usage
    /// received before the failure is kept), or `Error::Cancelled` (nothing
    /// is recorded).
    pub async fn chat_completion_stream(
        &self,
        mut request: ChatRequest,
        sink: mpsc::Sender<ChatChunk>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChatChoice>> {
        let stage = Stage::ChatCompletionStream;
        request.model = self.resolve_model(&request.model);
        request.include_usage = true;
        let model = request.model.clone();
        let logged_messages = self.log.as_ref().map(|_| request.messages.clone());

        debug!(model = %model, "Chat completion stream");

        let mut stream = cancellable(stage, cancel, self.provider.chat_stream(request))
            .await
            .map_err(|e| e.at_stage(stage))?;

        let mut assembler = StreamAssembler::new();
        let mut forwarding = true;

        let outcome: Result<()> = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break Err(Error::Cancelled(stage)),
                next = stream.next() => next,
            };

            let chunk = match next {
                None => break Ok(()),
                Some(Err(e)) => break Err(e.at_stage(stage)),
                Some(Ok(chunk)) => chunk,
            };

            assembler.push(&chunk);

            if forwarding {
                let sent = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break Err(Error::Cancelled(stage)),
                    sent = sink.send(chunk) => sent,
                };
                if sent.is_err() {
                    warn!(model = %model, "Stream receiver dropped; draining for usage");
                    forwarding = false;
                }
            }
        };

        match &outcome {
            Err(Error::Cancelled(_)) => {
                warn!(model = %model, chunks = assembler.chunk_count(), "Stream cancelled");
            }
            _ => match assembler.usage() {
                Some(usage) => self.usage.add(&model, usage).await,
                None => warn!(model = %model, "Stream ended without usage"),
            },
        }
        outcome?;

        let choices = assembler.finish();
        self.log_exchange(logged_messages, &choices).await;

        Ok(choices)
    }

    /// Create embeddings and record usage when the model is known
    ///
    /// # Errors
    /// Returns the provider failure prefixed with the embeddings stage, or
    /// `Error::Cancelled`.
    pub async fn create_embeddings(
        &self,
        request: EmbeddingRequest,
        cancel: &CancellationToken,
    ) -> Result<EmbeddingOutcome> {
        let stage = Stage::Embeddings;
        let (request, billed_model) = match request {
            EmbeddingRequest::Model(mut params) => {
                if params.model.is_empty() {
                    params.model = self.config.default_embedding_model.clone();
                }
                let model = params.model.clone();
                (EmbeddingRequest::Model(params), Some(model))
            }
            raw @ EmbeddingRequest::Raw(_) => (raw, None),
        };

        let response = cancellable(stage, cancel, self.provider.embeddings(request))
            .await
            .map_err(|e| e.at_stage(stage))?;

        let accounting = match billed_model {
            Some(model) => {
                self.usage.add(&model, response.usage).await;
                Accounting::Recorded { model }
            }
            None => {
                warn!(
                    reported_model = %response.model,
                    "Embedding request is not a single-model request; usage not recorded"
                );
                Accounting::Skipped(SkipReason::UnrecognizedVariant)
            }
        };

        Ok(EmbeddingOutcome {
            response,
            accounting,
        })
    }

    async fn log_exchange(&self, messages: Option<Vec<Message>>, choices: &[ChatChoice]) {
        let (Some(log), Some(messages)) = (&self.log, messages) else {
            return;
        };
        if let Err(e) = log.record(&messages, choices).await {
            warn!(error = %e, "Failed to write request log");
        }
    }
}

/// Race `call` against the caller's cancellation token
async fn cancellable<T>(
    stage: Stage,
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(%stage, "Request cancelled");
            Err(Error::Cancelled(stage))
        }
        result = call => result,
    }
}
