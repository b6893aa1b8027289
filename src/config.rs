//! Client configuration and environment loading

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use secrecy::SecretString;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "HYPERCLOVA_API_KEY";

/// Environment variable overriding the service base URL.
pub const ENV_BASE_URL: &str = "HYPERCLOVA_BASE_URL";

/// Default CLOVA Studio endpoint.
pub const DEFAULT_BASE_URL: &str = "https://clovastudio.stream.ntruss.com";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by every call a [`Client`](crate::Client) makes.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: SecretString,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) connect_timeout: Duration,
    pub(crate) retry: RetryPolicy,
}

impl ClientConfig {
    /// Configuration with an explicit API key and all other settings at
    /// their defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Configuration(format!(
                "no API key provided; set {ENV_API_KEY} or pass one explicitly"
            )));
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: default_base_url()?,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
        })
    }

    /// Configuration from `HYPERCLOVA_API_KEY` and `HYPERCLOVA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| {
            Error::Configuration(format!(
                "no API key provided; set {ENV_API_KEY} or pass one explicitly"
            ))
        })?;
        Self::new(api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}

// Manual Debug keeps the key out of logs even if SecretString's own
// formatting changes.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

pub(crate) fn default_base_url() -> Result<Url> {
    let raw = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    parse_base_url(&raw)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    // A trailing slash would make Url::join drop the last path segment.
    let trimmed = raw.trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| Error::Configuration(format!("invalid base URL {raw:?}: {e}")))
}
