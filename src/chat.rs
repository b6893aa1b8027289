//! Chat completions surface

use crate::client::Client;
use crate::error::{Error, Result};
use crate::model::{Capability, Model};
use crate::streaming::{self, ChatStream};
use crate::types::{
    ChatCompletion, ChatRequest, Message, ResponseFormat, ThinkingConfig, ThinkingEffort, Tool,
    ToolChoice,
};
use uuid::Uuid;

/// Parameters for a chat completion call.
///
/// Construct with [`ChatParams::new`] and layer options with the `with_*`
/// methods. Validation and the model-specific token-field rules are applied
/// when the call is made.
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: Model,
    pub messages: Vec<Message>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub max_tokens: Option<u32>,
    pub max_completion_tokens: Option<u32>,
    pub repetition_penalty: Option<f64>,
    pub stop: Option<Vec<String>>,
    pub seed: Option<i64>,
    pub include_ai_filters: Option<bool>,
    pub thinking: Option<ThinkingConfig>,
    pub tools: Option<Vec<Tool>>,
    pub tool_choice: Option<ToolChoice>,
    pub response_format: Option<ResponseFormat>,
    /// Correlation id sent as `X-NCP-CLOVASTUDIO-REQUEST-ID`; a v4 UUID is
    /// generated when unset.
    pub request_id: Option<String>,
}

impl ChatParams {
    pub fn new(model: Model, messages: Vec<Message>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            top_p: None,
            top_k: None,
            max_tokens: None,
            max_completion_tokens: None,
            repetition_penalty: None,
            stop: None,
            seed: None,
            include_ai_filters: None,
            thinking: None,
            tools: None,
            tool_choice: None,
            response_format: None,
            request_id: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_completion_tokens);
        self
    }

    pub fn with_repetition_penalty(mut self, repetition_penalty: f64) -> Self {
        self.repetition_penalty = Some(repetition_penalty);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_ai_filters(mut self, include: bool) -> Self {
        self.include_ai_filters = Some(include);
        self
    }

    pub fn with_thinking(mut self, effort: ThinkingEffort) -> Self {
        self.thinking = Some(ThinkingConfig::new(effort));
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Reject out-of-range parameters and model/feature mismatches before
    /// any I/O happens.
    fn validate(&self) -> Result<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(invalid_param("temperature must be between 0.0 and 1.0"));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid_param("topP must be between 0.0 and 1.0"));
            }
        }
        if let Some(k) = self.top_k {
            if k > 128 {
                return Err(invalid_param("topK must be at most 128"));
            }
        }
        if let Some(r) = self.repetition_penalty {
            if r <= 0.0 || r > 2.0 {
                return Err(invalid_param(
                    "repetitionPenalty must be greater than 0.0 and at most 2.0",
                ));
            }
        }
        if let Some(s) = self.seed {
            if !(0..=u32::MAX as i64).contains(&s) {
                return Err(invalid_param("seed must fit in an unsigned 32-bit value"));
            }
        }
        if self.max_tokens.is_some() && self.max_completion_tokens.is_some() {
            return Err(invalid_param(
                "maxTokens and maxCompletionTokens are mutually exclusive",
            ));
        }

        if self.thinking.is_some() {
            self.require(Capability::Thinking)?;
        }
        if self.response_format.is_some() {
            self.require(Capability::StructuredOutput)?;
        }
        if self.tools.is_some() {
            self.require(Capability::FunctionCalling)?;
        }
        if self.messages.iter().any(|m| m.content.has_image()) {
            self.require(Capability::Vision)?;
        }

        Ok(())
    }

    fn require(&self, capability: Capability) -> Result<()> {
        if self.model.supports(capability) {
            Ok(())
        } else {
            Err(Error::UnsupportedCapability {
                model: self.model.to_string(),
                capability,
            })
        }
    }

    /// Build the wire body, applying the model-specific token-field rules:
    ///
    /// - HCX-007 only accepts `maxCompletionTokens`; a caller-supplied
    ///   `max_tokens` is carried over into it, and when neither was given
    ///   the default derives from the thinking effort.
    /// - Every other model only accepts `maxTokens`, with the mirror-image
    ///   carry-over and no implicit default.
    /// - Structured output on HCX-007 without an explicit thinking config
    ///   forces `thinking.effort = "none"`.
    pub(crate) fn wire_request(&self) -> ChatRequest {
        let mut request = ChatRequest {
            messages: self.messages.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_tokens: None,
            max_completion_tokens: None,
            repetition_penalty: self.repetition_penalty,
            stop: self.stop.clone(),
            seed: self.seed,
            include_ai_filters: self.include_ai_filters,
            thinking: self.thinking,
            tools: self.tools.clone(),
            tool_choice: self.tool_choice.clone(),
            response_format: self.response_format.clone(),
        };

        if self.model.uses_completion_tokens() {
            let budget = self
                .max_completion_tokens
                .or(self.max_tokens)
                .unwrap_or_else(|| {
                    self.model
                        .default_completion_tokens(self.thinking.map(|t| t.effort))
                });
            request.max_completion_tokens = Some(budget);

            if request.response_format.is_some() && request.thinking.is_none() {
                request.thinking = Some(ThinkingConfig::new(ThinkingEffort::None));
            }
        } else {
            request.max_tokens = self.max_tokens.or(self.max_completion_tokens);
        }

        request
    }

    fn request_id(&self) -> String {
        self.request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    fn path(&self) -> String {
        format!("/v3/chat-completions/{}", self.model)
    }
}

fn invalid_param(message: &str) -> Error {
    Error::InvalidRequest {
        code: "invalid_parameter".to_string(),
        message: message.to_string(),
    }
}

/// Handle for the chat completions endpoint, obtained from
/// [`Client::chat`](crate::Client::chat).
#[derive(Debug, Clone)]
pub struct ChatCompletions {
    client: Client,
}

impl ChatCompletions {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Run a chat completion and wait for the full response.
    pub async fn create(&self, params: ChatParams) -> Result<ChatCompletion> {
        params.validate()?;
        let request = params.wire_request();
        self.client
            .post_json(&params.path(), &request, &params.request_id())
            .await
    }

    /// Run a chat completion and stream incremental chunks as they arrive.
    pub async fn create_stream(&self, params: ChatParams) -> Result<ChatStream> {
        params.validate()?;
        let request = params.wire_request();
        let response = self
            .client
            .post_stream(&params.path(), &request, &params.request_id())
            .await?;
        Ok(streaming::decode_stream(response.bytes_stream()))
    }
}
