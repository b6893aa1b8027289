//! SSE decoding and stream reassembly for chat completions
//!
//! The service emits three event types on a streaming completion:
//! `token` events carry incremental deltas, one `result` event carries the
//! complete message with usage and filter verdicts, and an `error` event
//! carries the standard status envelope.

use crate::error::{self, Error, Result};
use crate::types::{
    AiFilter, ChatChunk, ChatCompletion, ChunkKind, CompletionMessage, FinishReason, Role,
    ToolCall, Usage,
};
use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use serde::Deserialize;

/// Stream of decoded chat chunks.
pub type ChatStream = BoxStream<'static, Result<ChatChunk>>;

#[derive(Debug, Deserialize)]
struct ErrorEvent {
    status: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    code: String,
    message: String,
}

/// Decode an SSE byte stream into [`ChatChunk`]s.
///
/// Unknown event types (keepalives and future additions) are skipped. A
/// malformed payload fails the stream rather than silently dropping output.
pub(crate) fn decode_stream(
    bytes: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> ChatStream {
    Box::pin(bytes.eventsource().filter_map(|item| async move {
        match item {
            Ok(event) => match event.event.as_str() {
                "token" => Some(parse_chunk(&event.data, ChunkKind::Token)),
                "result" => Some(parse_chunk(&event.data, ChunkKind::Result)),
                "error" => Some(Err(parse_error_event(&event.data))),
                _ => None,
            },
            Err(e) => Some(Err(Error::Stream(e.to_string()))),
        }
    }))
}

fn parse_chunk(data: &str, kind: ChunkKind) -> Result<ChatChunk> {
    let mut chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| Error::Stream(format!("invalid chunk payload: {e}")))?;
    chunk.kind = kind;
    Ok(chunk)
}

fn parse_error_event(data: &str) -> Error {
    match serde_json::from_str::<ErrorEvent>(data) {
        Ok(event) => error::map_vendor_code(&event.status.code, &event.status.message),
        Err(_) => Error::Stream(format!("unrecognized error event: {data}")),
    }
}

/// Reassembles a stream of chunks into a [`ChatCompletion`].
///
/// Token deltas are concatenated in order; the final `result` event wins for
/// finish reason, usage, tool calls, and filter verdicts. Its repeated
/// content and thinking content are only taken when no delta of that kind
/// arrived in a token event.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    role: Option<Role>,
    content: String,
    thinking_content: String,
    tool_calls: Option<Vec<ToolCall>>,
    finish_reason: Option<FinishReason>,
    created: Option<i64>,
    seed: Option<i64>,
    usage: Option<Usage>,
    ai_filter: Option<Vec<AiFilter>>,
    saw_token_content: bool,
    saw_token_thinking: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the accumulated state.
    pub fn push(&mut self, chunk: &ChatChunk) {
        if self.role.is_none() {
            self.role = chunk.message.role;
        }
        self.created = chunk.created.or(self.created);
        self.seed = chunk.seed.or(self.seed);

        match chunk.kind {
            ChunkKind::Token => {
                if let Some(content) = &chunk.message.content {
                    self.content.push_str(content);
                    self.saw_token_content = true;
                }
                if let Some(thinking) = &chunk.message.thinking_content {
                    self.thinking_content.push_str(thinking);
                    self.saw_token_thinking = true;
                }
                if chunk.message.tool_calls.is_some() {
                    self.tool_calls = chunk.message.tool_calls.clone();
                }
                if chunk.finish_reason.is_some() {
                    self.finish_reason = chunk.finish_reason;
                }
            }
            ChunkKind::Result => {
                // The result event repeats the full message; each field is
                // taken only when no deltas of its kind arrived.
                if !self.saw_token_content {
                    if let Some(content) = &chunk.message.content {
                        self.content.push_str(content);
                    }
                }
                if !self.saw_token_thinking {
                    if let Some(thinking) = &chunk.message.thinking_content {
                        self.thinking_content.push_str(thinking);
                    }
                }
                if chunk.message.tool_calls.is_some() {
                    self.tool_calls = chunk.message.tool_calls.clone();
                }
                if chunk.finish_reason.is_some() {
                    self.finish_reason = chunk.finish_reason;
                }
                if chunk.usage.is_some() {
                    self.usage = chunk.usage.clone();
                }
                if chunk.ai_filter.is_some() {
                    self.ai_filter = chunk.ai_filter.clone();
                }
            }
        }
    }

    /// Finish accumulation and produce the assembled completion.
    pub fn finish(self) -> ChatCompletion {
        ChatCompletion {
            message: CompletionMessage {
                role: self.role.unwrap_or(Role::Assistant),
                content: self.content,
                thinking_content: if self.thinking_content.is_empty() {
                    None
                } else {
                    Some(self.thinking_content)
                },
                tool_calls: self.tool_calls,
            },
            finish_reason: self.finish_reason,
            created: self.created,
            seed: self.seed,
            usage: self.usage,
            ai_filter: self.ai_filter,
        }
    }

    /// Drain a whole stream into a completion, stopping at the first error.
    pub async fn collect(mut stream: ChatStream) -> Result<ChatCompletion> {
        let mut acc = Self::new();
        while let Some(chunk) = stream.next().await {
            acc.push(&chunk?);
        }
        Ok(acc.finish())
    }
}
