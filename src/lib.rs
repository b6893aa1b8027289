//! Rust client for the CLOVA Studio HyperCLOVA X API.
//!
//! Covers the chat completions endpoint (plain and SSE-streaming) and the
//! embedding endpoint, with typed requests and responses, capability
//! validation per model, bounded retries with exponential backoff, and an
//! optional blocking surface.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run() -> hyperclova::Result<()> {
//! use hyperclova::{ChatParams, Client, Message, Model};
//!
//! // Reads HYPERCLOVA_API_KEY (and optionally HYPERCLOVA_BASE_URL).
//! let client = Client::from_env()?;
//!
//! let completion = client
//!     .chat()
//!     .create(
//!         ChatParams::new(
//!             Model::Hcx007,
//!             vec![
//!                 Message::system("You are a helpful assistant"),
//!                 Message::user("Hello!"),
//!             ],
//!         )
//!         .with_temperature(0.7),
//!     )
//!     .await?;
//! println!("{}", completion.content());
//!
//! let embedding = client.embeddings().create("Hello world").await?;
//! println!("dimension: {}", embedding.dimension());
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming
//!
//! ```no_run
//! # async fn run() -> hyperclova::Result<()> {
//! use futures::StreamExt;
//! use hyperclova::{ChatParams, Client, Message, Model};
//!
//! let client = Client::from_env()?;
//! let mut stream = client
//!     .chat()
//!     .create_stream(ChatParams::new(
//!         Model::Hcx005,
//!         vec![Message::user("Tell me a story")],
//!     ))
//!     .await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     if let Some(delta) = chunk?.message.content {
//!         print!("{delta}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod compat;
pub mod types;

mod chat;
mod client;
mod config;
mod embeddings;
mod error;
mod model;
mod retry;
mod streaming;

pub use chat::{ChatCompletions, ChatParams};
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL, ENV_API_KEY, ENV_BASE_URL};
pub use embeddings::Embeddings;
pub use error::{Error, Result};
pub use model::{Capability, Model};
pub use retry::RetryPolicy;
pub use streaming::{ChatStream, StreamAccumulator};

pub use types::{
    ChatChunk, ChatCompletion, ChunkKind, ContentPart, Embedding, FinishReason,
    FunctionDefinition, Message, MessageContent, ResponseFormat, Role, ThinkingConfig,
    ThinkingEffort, Tool, ToolCall, ToolChoice, Usage,
};
