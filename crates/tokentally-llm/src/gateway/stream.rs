//! Streamed response reassembly
//!
//! Chunks carry per-choice deltas tagged with the choice index. Deltas are
//! appended in arrival order into a slot per index; the slot vector grows
//! whenever an index is at or past its current length.

use crate::completion::{ChatChoice, ChatChunk, TokenUsage};
use crate::message::{Message, MessageRole};
use tracing::warn;

/// Highest number of choices a single stream may carry
pub const MAX_STREAM_CHOICES: usize = 128;

#[derive(Debug, Default)]
struct PartialChoice {
    role: Option<MessageRole>,
    content: String,
    finish_reason: Option<String>,
}

/// Per-stream reassembly state
#[derive(Debug, Default)]
pub struct StreamAssembler {
    slots: Vec<Option<PartialChoice>>,
    usage: Option<TokenUsage>,
    chunks: usize,
}

impl StreamAssembler {
    /// Create an empty assembler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the state
    pub fn push(&mut self, chunk: &ChatChunk) {
        self.chunks += 1;

        for choice in &chunk.choices {
            let index = choice.index as usize;
            if index >= MAX_STREAM_CHOICES {
                warn!(index, "Dropping stream delta with out-of-range choice index");
                continue;
            }
            if index >= self.slots.len() {
                self.slots.resize_with(index + 1, || None);
            }

            let slot = self.slots[index].get_or_insert_with(PartialChoice::default);
            if slot.role.is_none() {
                slot.role = choice.delta.role;
            }
            if let Some(content) = &choice.delta.content {
                slot.content.push_str(content);
            }
            if choice.finish_reason.is_some() {
                slot.finish_reason.clone_from(&choice.finish_reason);
            }
        }

        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
    }

    /// Usage from the most recent usage-bearing chunk
    #[must_use]
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }

    /// Number of chunks folded in so far
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Finalised choices ordered by index; indices never seen are skipped
    #[must_use]
    pub fn finish(self) -> Vec<ChatChoice> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.map(|partial| ChatChoice {
                    index: index as u32,
                    message: Message {
                        role: partial.role.unwrap_or(MessageRole::Assistant),
                        content: partial.content,
                        name: None,
                    },
                    finish_reason: partial.finish_reason,
                })
            })
            .collect()
    }
}
