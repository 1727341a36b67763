//! HTTP transport seam between the client and the wire.
//!
//! The [`Transport`] trait carries the whole network contract: one call in,
//! one `{status, json}` pair out, with connection drops and read timeouts
//! reported as distinct error variants so the retry policy can treat them
//! differently from ordinary request failures. The production implementation
//! wraps a pooled `reqwest` client; tests swap in a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;
use snafu::{Backtrace, Snafu};
use tracing::{debug, warn};

/// Failures raised by a [`Transport`] implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    /// The TCP connection could not be established or was dropped mid-request.
    #[snafu(display("connection failure: {message}"))]
    Connect {
        message: String,
        backtrace: Backtrace,
    },

    /// The server accepted the connection but did not answer in time.
    #[snafu(display("read timeout: {message}"))]
    Timeout {
        message: String,
        backtrace: Backtrace,
    },

    /// Any other request failure (TLS, malformed URL, body streaming).
    #[snafu(display("request failed: {message}"))]
    Request {
        message: String,
        backtrace: Backtrace,
    },
}

impl TransportError {
    /// Connection drops and read timeouts earn one cool-down-and-reconnect
    /// retry; everything else propagates immediately.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. } | TransportError::Timeout { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One outbound call, fully resolved: absolute URL, extra headers, body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The raw answer: HTTP status plus the decoded JSON body.
///
/// A body that is not valid JSON decodes to `Value::Null` rather than
/// failing the call, so status-first handling (e.g. 429) stays possible.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one request and returns the status and JSON body.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;

    /// Drops the underlying session and starts a fresh one.
    ///
    /// Called after a connection-level failure before the single retry; a
    /// no-op for transports with nothing to rebuild.
    fn reset(&self);
}

/// Production transport over a pooled `reqwest` client.
pub struct HttpTransport {
    client: ArcSwap<reqwest::Client>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ArcSwap::from_pointee(Self::build(timeout)?),
            timeout,
        })
    }

    fn build(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
        use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("kucoin_client-rs"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
    }

    fn classify(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TimeoutSnafu {
                message: error.to_string(),
            }
            .build()
        } else if error.is_connect() {
            ConnectSnafu {
                message: error.to_string(),
            }
            .build()
        } else {
            RequestSnafu {
                message: error.to_string(),
            }
            .build()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let client = self.client.load_full();

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::classify)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(Self::classify)?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(RawResponse { status, body })
    }

    fn reset(&self) {
        match Self::build(self.timeout) {
            Ok(fresh) => {
                debug!("rebuilding HTTP session");
                self.client.store(Arc::new(fresh));
            }
            Err(error) => {
                // The old session stays in use.
                warn!(%error, "could not rebuild HTTP session");
            }
        }
    }
}
