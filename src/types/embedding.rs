//! Embedding request and response types

use serde::{Deserialize, Serialize};

/// Longest input the embedding endpoint accepts, in characters.
pub const MAX_EMBEDDING_INPUT_CHARS: usize = 8192;

/// Wire body for `POST /v1/api-tools/embedding/v2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
}

/// An embedding vector with its token accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedding {
    pub embedding: Vec<f32>,
    pub input_tokens: u32,
}

impl Embedding {
    /// Dimensionality of the vector (1024 for the current endpoint).
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
