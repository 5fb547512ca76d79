//! Tokentally LLM - usage accounting for LLM provider calls
//!
//! This crate wraps an LLM provider client and keeps a running tally of
//! what every call cost:
//! - Cost: pricing table, per-model usage accumulator and cost report
//! - Gateway: default-model resolution, usage recording, stream reassembly
//!   and the optional request log
//! - Provider: the provider client trait and a scripted mock
//! - OpenAI: async-openai backed provider (chat, streaming chat, embeddings)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod cost;
pub mod embedding;
pub mod error;
pub mod gateway;
pub mod message;
pub mod openai;
pub mod provider;
pub mod util;

pub use completion::{ChatChoice, ChatChunk, ChatRequest, ChatResponse, ChunkChoice, TokenUsage};
pub use cost::{
    format_report, ModelPricing, ModelReport, ModelUsage, PricingTable, UsageAccumulator,
    UsageReport, UsageTotals,
};
pub use embedding::{EmbeddingParams, EmbeddingRequest, EmbeddingResponse, EmbeddingVector};
pub use error::{Error, Result, Stage};
pub use gateway::{
    Accounting, AiGateway, EmbeddingOutcome, GatewayConfig, RequestLog, SkipReason,
    StreamAssembler,
};
pub use message::{Message, MessageRole};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{ChatStream, LlmProvider, MockProvider};
