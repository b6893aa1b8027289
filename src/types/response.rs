//! Chat completion responses and streaming chunks

use super::message::Role;
use super::tool::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Token budget exhausted
    Length,
    /// Natural end of turn or stop sequence
    Stop,
    /// The model wants tool results before continuing
    ToolCalls,
}

/// Token accounting for a completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    /// Breakdown of completion tokens, e.g. thinking vs. answer tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<HashMap<String, u32>>,
}

/// One content-safety filter verdict. Scores run from "-1" (filter error)
/// through "2" (safe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFilter {
    pub group_name: String,
    pub name: String,
    pub score: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// The assistant message of a completed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    /// Reasoning trace, present when thinking mode was active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A completed chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletion {
    pub message: CompletionMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Creation timestamp in milliseconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_filter: Option<Vec<AiFilter>>,
}

impl ChatCompletion {
    /// The assistant's text content.
    pub fn content(&self) -> &str {
        &self.message.content
    }

    /// Tool calls the model issued, if any.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.message.tool_calls.as_deref()
    }
}

/// Which SSE event a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkKind {
    /// Incremental `token` event carrying a delta
    #[default]
    Token,
    /// Final `result` event carrying the complete message and usage
    Result,
}

/// Partial message payload of a streaming chunk. Every field is optional;
/// token events typically carry only a content or thinking delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// One streaming event decoded from the SSE feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatChunk {
    /// Whether this chunk is an incremental delta or the final result.
    /// Set by the stream decoder, not part of the wire payload.
    #[serde(skip, default)]
    pub kind: ChunkKind,
    pub message: ChunkMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_filter: Option<Vec<AiFilter>>,
}
