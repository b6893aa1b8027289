//! Error types and HTTP/vendor status mapping

use crate::model::Capability;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Result type for all client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the HyperCLOVA client
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication failed (HTTP 401/403 or vendor 401xx/403xx codes)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The request was rejected by the service (4xx)
    #[error("invalid request ({code}): {message}")]
    InvalidRequest { code: String, message: String },

    /// The service failed (5xx)
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Could not reach the service
    #[error("connection error: {0}")]
    Connection(String),

    /// The request timed out
    #[error("request timed out")]
    Timeout,

    /// An SSE stream failed mid-flight
    #[error("stream error: {0}")]
    Stream(String),

    /// The response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The client was misconfigured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The selected model does not support a requested feature
    #[error("model {model} does not support {capability}")]
    UnsupportedCapability { model: String, capability: Capability },
}

impl Error {
    /// Whether a retry could plausibly succeed.
    ///
    /// Authentication and request-shape failures are permanent; transport
    /// failures, rate limits, and 5xx responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Timeout | Error::RateLimit { .. } | Error::Server { .. }
        )
    }

    /// Server-suggested delay before retrying, if one was provided.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Connection(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Error::Parse(err.to_string())
        } else {
            Error::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Map an HTTP status code and response body to an [`Error`].
///
/// The body, when present, is the service's JSON envelope
/// `{"status": {"code": "...", "message": "..."}}`; its message is preferred
/// over the raw body text.
pub(crate) fn map_status(
    status: StatusCode,
    retry_after: Option<Duration>,
    body: Option<&str>,
) -> Error {
    let (code, message) = extract_status_fields(body)
        .unwrap_or_else(|| (status.as_u16().to_string(), default_message(status, body)));

    match status {
        StatusCode::UNAUTHORIZED => Error::Authentication("invalid API key".to_string()),
        StatusCode::FORBIDDEN => {
            Error::Authentication("access forbidden, check API key permissions".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimit {
            message,
            retry_after,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Error::Timeout,
        status if status.is_client_error() => Error::InvalidRequest { code, message },
        status if status.is_server_error() => Error::Server {
            status: status.as_u16(),
            message,
        },
        status => Error::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Map a vendor status code from the response envelope to an [`Error`].
///
/// Vendor codes are five digits whose leading three digits follow HTTP
/// status classes (`40100` for bad credentials, `42901` for throttling,
/// `50000` for internal failures).
pub(crate) fn map_vendor_code(code: &str, message: &str) -> Error {
    let class: u16 = code.get(..3).and_then(|c| c.parse().ok()).unwrap_or(0);

    match class {
        401 | 403 => Error::Authentication(message.to_string()),
        429 => Error::RateLimit {
            message: message.to_string(),
            retry_after: None,
        },
        400..=499 => Error::InvalidRequest {
            code: code.to_string(),
            message: message.to_string(),
        },
        500..=599 => Error::Server {
            status: class,
            message: message.to_string(),
        },
        _ => Error::InvalidRequest {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

/// Pull `status.code` / `status.message` out of an error body, if it is the
/// standard envelope shape.
fn extract_status_fields(body: Option<&str>) -> Option<(String, String)> {
    let json: Value = serde_json::from_str(body?).ok()?;
    let status = json.get("status")?;
    let code = status.get("code")?.as_str()?.to_string();
    let message = status.get("message")?.as_str()?.to_string();
    Some((code, message))
}

fn default_message(status: StatusCode, body: Option<&str>) -> String {
    match body {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!("HTTP error {}", status.as_u16()),
    }
}

/// Parse a `Retry-After` header value. Only the delta-seconds form is
/// handled; HTTP-date values are ignored.
pub(crate) fn parse_retry_after(header_value: &str) -> Option<Duration> {
    header_value.parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::Timeout.is_retryable());
        assert!(Error::Connection("refused".into()).is_retryable());
        assert!(Error::Server {
            status: 503,
            message: "overloaded".into()
        }
        .is_retryable());
        assert!(!Error::Authentication("bad key".into()).is_retryable());
        assert!(!Error::InvalidRequest {
            code: "40000".into(),
            message: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, None, None),
            Error::Authentication(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, None, None),
            Error::RateLimit { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, None, None),
            Error::InvalidRequest { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, None, None),
            Error::Server { status: 500, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::GATEWAY_TIMEOUT, None, None),
            Error::Timeout
        ));
    }

    #[test]
    fn envelope_message_preferred_over_raw_body() {
        let body = r#"{"status": {"code": "40001", "message": "messages must not be empty"}}"#;
        let err = map_status(StatusCode::BAD_REQUEST, None, Some(body));
        match err {
            Error::InvalidRequest { code, message } => {
                assert_eq!(code, "40001");
                assert_eq!(message, "messages must not be empty");
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn vendor_code_mapping() {
        assert!(matches!(
            map_vendor_code("40100", "invalid key"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            map_vendor_code("42901", "throttled"),
            Error::RateLimit { .. }
        ));
        assert!(matches!(
            map_vendor_code("40003", "bad param"),
            Error::InvalidRequest { .. }
        ));
        assert!(matches!(
            map_vendor_code("50000", "internal"),
            Error::Server { status: 500, .. }
        ));
    }

    #[test]
    fn retry_after_seconds_only() {
        assert_eq!(parse_retry_after("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
