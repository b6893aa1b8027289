//! Blocking call surface
//!
//! Wraps the async client in a private current-thread tokio runtime for
//! callers that are not async. Do not use these types from inside an async
//! context; blocking on a runtime from within another runtime panics.

use crate::chat::ChatParams;
use crate::error::{Error, Result};
use crate::streaming::{ChatStream, StreamAccumulator};
use crate::types::{ChatChunk, ChatCompletion, Embedding};
use futures::StreamExt;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Blocking counterpart of [`Client`](crate::Client).
///
/// ```no_run
/// # fn run() -> hyperclova::Result<()> {
/// use hyperclova::blocking::Client;
/// use hyperclova::{ChatParams, Message, Model};
///
/// let client = Client::from_env()?;
/// let completion = client.chat().create(ChatParams::new(
///     Model::HcxDash002,
///     vec![Message::user("Hello!")],
/// ))?;
/// println!("{}", completion.content());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    runtime: Arc<Runtime>,
    inner: crate::Client,
}

impl Client {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::Client::new(api_key)?)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_async(crate::Client::from_env()?)
    }

    /// Wrap an already-configured async client.
    pub fn from_async(inner: crate::Client) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            runtime: Arc::new(runtime),
            inner,
        })
    }

    pub fn chat(&self) -> ChatCompletions {
        ChatCompletions {
            runtime: Arc::clone(&self.runtime),
            inner: self.inner.chat(),
        }
    }

    pub fn embeddings(&self) -> Embeddings {
        Embeddings {
            runtime: Arc::clone(&self.runtime),
            inner: self.inner.embeddings(),
        }
    }
}

/// Blocking chat completions surface.
#[derive(Debug, Clone)]
pub struct ChatCompletions {
    runtime: Arc<Runtime>,
    inner: crate::chat::ChatCompletions,
}

impl ChatCompletions {
    pub fn create(&self, params: ChatParams) -> Result<ChatCompletion> {
        self.runtime.block_on(self.inner.create(params))
    }

    /// Start a streaming completion and iterate chunks synchronously.
    pub fn create_stream(&self, params: ChatParams) -> Result<ChatChunks> {
        let stream = self.runtime.block_on(self.inner.create_stream(params))?;
        Ok(ChatChunks {
            runtime: Arc::clone(&self.runtime),
            stream,
        })
    }
}

/// Blocking iterator over streaming chunks.
pub struct ChatChunks {
    runtime: Arc<Runtime>,
    stream: ChatStream,
}

impl ChatChunks {
    /// Drain the rest of the stream into a reassembled completion.
    pub fn collect_completion(mut self) -> Result<ChatCompletion> {
        let mut acc = StreamAccumulator::new();
        for chunk in &mut self {
            acc.push(&chunk?);
        }
        Ok(acc.finish())
    }
}

impl Iterator for ChatChunks {
    type Item = Result<ChatChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}

/// Blocking embeddings surface.
#[derive(Debug, Clone)]
pub struct Embeddings {
    runtime: Arc<Runtime>,
    inner: crate::embeddings::Embeddings,
}

impl Embeddings {
    pub fn create(&self, text: impl Into<String>) -> Result<Embedding> {
        self.runtime.block_on(self.inner.create(text))
    }

    pub fn create_with_request_id(
        &self,
        text: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Result<Embedding> {
        self.runtime
            .block_on(self.inner.create_with_request_id(text, request_id))
    }

    pub fn create_batch<I, S>(&self, texts: I) -> Result<Vec<Embedding>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runtime.block_on(self.inner.create_batch(texts))
    }
}
