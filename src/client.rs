//! HTTP client plumbing shared by the chat and embeddings surfaces

use crate::chat::ChatCompletions;
use crate::config::{self, ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::embeddings::Embeddings;
use crate::error::{self, Error, Result};
use crate::retry::{self, RetryPolicy};
use crate::types::ApiEnvelope;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Correlation header recognized by CLOVA Studio.
pub(crate) const REQUEST_ID_HEADER: &str = "X-NCP-CLOVASTUDIO-REQUEST-ID";

const USER_AGENT: &str = concat!("hyperclova/", env!("CARGO_PKG_VERSION"));

/// Streams are exempt from the per-request timeout; this caps how long one
/// may stay open.
const STREAM_TIMEOUT: Duration = Duration::from_secs(3600);

/// Client for the CLOVA Studio HyperCLOVA X API.
///
/// Cheap to clone; all clones share one pooled HTTP connection set.
///
/// ```no_run
/// # async fn run() -> hyperclova::Result<()> {
/// use hyperclova::{ChatParams, Client, Message, Model};
///
/// let client = Client::from_env()?;
/// let completion = client
///     .chat()
///     .create(ChatParams::new(
///         Model::Hcx005,
///         vec![
///             Message::system("You are a helpful assistant"),
///             Message::user("Hello!"),
///         ],
///     ))
///     .await?;
/// println!("{}", completion.content());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Client with an explicit API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Client configured from `HYPERCLOVA_API_KEY` / `HYPERCLOVA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client from a prebuilt configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Chat completions surface.
    pub fn chat(&self) -> ChatCompletions {
        ChatCompletions::new(self.clone())
    }

    /// Embeddings surface.
    pub fn embeddings(&self) -> Embeddings {
        Embeddings::new(self.clone())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn auth_header(&self) -> Result<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.expose_secret()))
                .map_err(|_| {
                    Error::Configuration("API key contains invalid header characters".to_string())
                })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// POST a JSON body and decode the enveloped result, retrying transient
    /// failures per the configured policy.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B, request_id: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        retry::with_retry(&self.config.retry, || {
            self.execute_json(path, body, request_id)
        })
        .await
    }

    async fn execute_json<B, T>(&self, path: &str, body: &B, request_id: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| Error::Configuration(format!("invalid endpoint path {path:?}: {e}")))?;

        debug!(%url, request_id, "sending request");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth_header()?)
            .header(REQUEST_ID_HEADER, request_id)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(error::parse_retry_after);
            let body = response.text().await.ok();
            warn!(%status, request_id, "request failed");
            return Err(error::map_status(status, retry_after, body.as_deref()));
        }

        let text = response.text().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;

        if !envelope.status.is_success() {
            warn!(
                code = %envelope.status.code,
                request_id,
                "service reported an error"
            );
            return Err(error::map_vendor_code(
                &envelope.status.code,
                &envelope.status.message,
            ));
        }

        info!(request_id, "request completed");
        envelope
            .result
            .ok_or_else(|| Error::Parse("response envelope missing result".to_string()))
    }

    /// POST a JSON body and hand back the raw response for SSE consumption.
    /// Streams are attempted once; the retry policy does not apply.
    pub(crate) async fn post_stream<B>(
        &self,
        path: &str,
        body: &B,
        request_id: &str,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| Error::Configuration(format!("invalid endpoint path {path:?}: {e}")))?;

        debug!(%url, request_id, "opening stream");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth_header()?)
            .header(REQUEST_ID_HEADER, request_id)
            .header(ACCEPT, "text/event-stream")
            .timeout(STREAM_TIMEOUT)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(error::parse_retry_after);
            let body = response.text().await.ok();
            warn!(%status, request_id, "stream request failed");
            return Err(error::map_status(status, retry_after, body.as_deref()));
        }

        info!(request_id, "stream opened");
        Ok(response)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
}

impl ClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Shorthand for a policy with the given retry budget.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry = Some(RetryPolicy::new(max_retries));
        self
    }

    /// Build the client, falling back to environment variables for missing
    /// key and base URL.
    pub fn build(self) -> Result<Client> {
        let mut config = match self.api_key {
            Some(key) => ClientConfig::new(key)?,
            None => ClientConfig::from_env()?,
        };

        if let Some(raw) = self.base_url {
            config.base_url = config::parse_base_url(&raw)?;
        }
        config.timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        config.connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if let Some(retry) = self.retry {
            config.retry = retry;
        }

        Client::from_config(config)
    }
}
