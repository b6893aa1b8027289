//! Embeddings surface

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{Embedding, EmbeddingRequest, MAX_EMBEDDING_INPUT_CHARS};
use futures::future::try_join_all;
use uuid::Uuid;

const EMBEDDING_PATH: &str = "/v1/api-tools/embedding/v2";

/// Handle for the embedding endpoint, obtained from
/// [`Client::embeddings`](crate::Client::embeddings).
#[derive(Debug, Clone)]
pub struct Embeddings {
    client: Client,
}

impl Embeddings {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Embed a single text.
    pub async fn create(&self, text: impl Into<String>) -> Result<Embedding> {
        self.create_with_request_id(text, Uuid::new_v4().to_string())
            .await
    }

    /// Embed a single text with a caller-chosen correlation id.
    pub async fn create_with_request_id(
        &self,
        text: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Result<Embedding> {
        let text = text.into();
        if text.chars().count() > MAX_EMBEDDING_INPUT_CHARS {
            return Err(Error::InvalidRequest {
                code: "invalid_parameter".to_string(),
                message: format!(
                    "embedding input exceeds {MAX_EMBEDDING_INPUT_CHARS} characters"
                ),
            });
        }

        let request = EmbeddingRequest { text };
        self.client
            .post_json(EMBEDDING_PATH, &request, &request_id.into())
            .await
    }

    /// Embed several texts concurrently.
    ///
    /// The endpoint has no native batch form, so this fans out one request
    /// per text and preserves input order in the output. Correlation ids are
    /// the given prefix suffixed with the text's index.
    pub async fn create_batch<I, S>(&self, texts: I) -> Result<Vec<Embedding>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_batch_with_request_id(texts, Uuid::new_v4().to_string())
            .await
    }

    /// Batched embedding with a caller-chosen correlation id prefix.
    pub async fn create_batch_with_request_id<I, S>(
        &self,
        texts: I,
        request_id_prefix: impl Into<String>,
    ) -> Result<Vec<Embedding>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefix = request_id_prefix.into();
        let calls = texts.into_iter().enumerate().map(|(index, text)| {
            let request_id = format!("{prefix}-{index}");
            self.create_with_request_id(text.into(), request_id)
        });
        try_join_all(calls).await
    }
}
