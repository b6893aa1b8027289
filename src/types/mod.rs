//! Wire types for the chat completions and embeddings APIs
//!
//! All structs serialize to the camelCase field names the service expects.
//! These are plain value objects; validation of ranges and model/feature
//! pairings happens in the call surfaces, not here.

mod embedding;
mod message;
mod request;
mod response;
mod tool;

pub use embedding::{Embedding, EmbeddingRequest, MAX_EMBEDDING_INPUT_CHARS};
pub use message::{ContentPart, DataUri, ImageUrl, Message, MessageContent, Role};
pub use request::{ChatRequest, ResponseFormat, ThinkingConfig, ThinkingEffort};
pub use response::{
    AiFilter, ChatChunk, ChatCompletion, ChunkKind, ChunkMessage, CompletionMessage, FinishReason,
    Usage,
};
pub use tool::{FunctionDefinition, FunctionName, Tool, ToolCall, ToolCallFunction, ToolChoice};

use serde::Deserialize;

/// Vendor response envelope carried by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub status: ApiStatus,
    pub result: Option<T>,
}

/// `status` block of the envelope. `"20000"` means success.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiStatus {
    pub code: String,
    pub message: String,
}

impl ApiStatus {
    pub const SUCCESS: &'static str = "20000";

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }
}
