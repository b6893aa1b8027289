//! Model identifiers, capabilities, and token defaults

use crate::types::ThinkingEffort;
use std::fmt;

/// HyperCLOVA X model identifiers.
///
/// `Other` carries any model id the service ships that this crate does not
/// know yet; capability validation is skipped for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// HCX-005: multimodal model with image input support
    Hcx005,
    /// HCX-007: reasoning model with thinking mode and structured output
    Hcx007,
    /// HCX-DASH-002: lightweight model
    HcxDash002,
    /// A model id unknown to this crate
    Other(String),
}

/// Features a model may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Reasoning traces controlled by `thinking.effort`
    Thinking,
    /// Image content in messages
    Vision,
    /// JSON responses constrained by a schema
    StructuredOutput,
    /// Tool definitions and tool calls
    FunctionCalling,
}

impl Model {
    /// Wire identifier used in the request path.
    pub fn as_str(&self) -> &str {
        match self {
            Model::Hcx005 => "HCX-005",
            Model::Hcx007 => "HCX-007",
            Model::HcxDash002 => "HCX-DASH-002",
            Model::Other(id) => id,
        }
    }

    /// Whether the model supports a capability. Unknown models are assumed
    /// capable and left for the service to reject.
    pub fn supports(&self, capability: Capability) -> bool {
        match self {
            Model::Hcx005 => matches!(
                capability,
                Capability::Vision | Capability::FunctionCalling
            ),
            Model::Hcx007 => matches!(
                capability,
                Capability::Thinking | Capability::StructuredOutput | Capability::FunctionCalling
            ),
            Model::HcxDash002 => matches!(capability, Capability::FunctionCalling),
            Model::Other(_) => true,
        }
    }

    /// Whether the model takes `maxCompletionTokens` instead of `maxTokens`.
    pub(crate) fn uses_completion_tokens(&self) -> bool {
        matches!(self, Model::Hcx007)
    }

    /// Default completion budget when the caller did not set one. Only
    /// applies to models that take `maxCompletionTokens`; the budget scales
    /// with thinking effort and falls back to 2048 without an explicit
    /// thinking config.
    pub(crate) fn default_completion_tokens(&self, effort: Option<ThinkingEffort>) -> u32 {
        match effort {
            Some(ThinkingEffort::None) => 512,
            Some(ThinkingEffort::Low) => 5120,
            Some(ThinkingEffort::Medium) => 10_240,
            Some(ThinkingEffort::High) => 20_480,
            None => 2048,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Model {
    fn from(id: &str) -> Self {
        match id {
            "HCX-005" => Model::Hcx005,
            "HCX-007" => Model::Hcx007,
            "HCX-DASH-002" => Model::HcxDash002,
            other => Model::Other(other.to_string()),
        }
    }
}

impl From<String> for Model {
    fn from(id: String) -> Self {
        Model::from(id.as_str())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Thinking => "thinking mode",
            Capability::Vision => "image input",
            Capability::StructuredOutput => "structured output",
            Capability::FunctionCalling => "function calling",
        };
        f.write_str(name)
    }
}
