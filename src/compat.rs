//! OpenAI-format views of completions
//!
//! Some downstream tooling only understands the OpenAI chat completion
//! shape. This converts a finished [`ChatCompletion`] into that layout:
//! a single choice, snake_case usage fields, and the generation seed as the
//! system fingerprint.

use crate::model::Model;
use crate::types::ChatCompletion;
use serde_json::{json, Value};

/// Render a completion as an OpenAI-shaped `chat.completion` value.
pub fn to_openai_value(completion: &ChatCompletion, model: &Model) -> Value {
    let created_secs = completion.created.map(|ms| ms / 1000).unwrap_or(0);

    let mut message = json!({
        "role": "assistant",
        "content": completion.message.content,
    });
    if let Some(tool_calls) = &completion.message.tool_calls {
        message["tool_calls"] = json!(tool_calls);
    }
    if let Some(thinking) = &completion.message.thinking_content {
        message["thinking_content"] = json!(thinking);
    }

    let usage = completion.usage.as_ref();

    json!({
        "id": format!("chatcmpl-{created_secs}"),
        "object": "chat.completion",
        "created": created_secs,
        "model": model.as_str(),
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": completion.finish_reason,
        }],
        "usage": {
            "prompt_tokens": usage.map_or(0, |u| u.prompt_tokens),
            "completion_tokens": usage.map_or(0, |u| u.completion_tokens),
            "total_tokens": usage.map_or(0, |u| u.total_tokens),
        },
        "system_fingerprint": completion.seed.map(|s| s.to_string()).unwrap_or_default(),
    })
}
