//! The REST client: configuration, request building, envelope decoding.

pub mod auth;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::client::auth::Credentials;
use crate::client::transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};
use crate::errors::Error;
use crate::history::RetryPolicy;

const LIVE_URL: &str = "https://api.kucoin.com";
const SANDBOX_URL: &str = "https://openapi-sandbox.kucoin.com";

/// Business code the exchange uses for a successful call.
pub(crate) const SUCCESS_CODE: &str = "200000";
/// Business code for a trading pair the exchange does not list.
pub(crate) const INVALID_SYMBOL_CODE: &str = "400100";

/// Errors that can occur while constructing a [`Client`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientInitError {
    /// Credential environment variables are missing or empty.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// Failed to build the underlying HTTP client.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Client construction options.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target the paper-trading environment instead of the live exchange.
    pub sandbox: bool,
    /// Per-request timeout for the HTTP session.
    pub timeout: Duration,
    /// Failure-handling tunables for paginated candle queries.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sandbox: false,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// KuCoin REST API client.
///
/// One client owns one HTTP session, reused across calls and rebuilt from
/// scratch only after a connection-level failure. Clients built without
/// credentials can call every public endpoint; private endpoints return
/// [`Error::MissingCredentials`].
pub struct Client {
    transport: Arc<dyn Transport>,
    credentials: Option<Credentials>,
    base_url: String,
    retry: RetryPolicy,
}

/// Whether a request must carry the `KC-API-*` signature headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Public,
    Private,
}

impl Client {
    /// Creates an unauthenticated client for public endpoints.
    pub fn new(config: ClientConfig) -> Result<Self, ClientInitError> {
        let transport = HttpTransport::new(config.timeout).context(ClientBuildSnafu)?;
        Ok(Self::assemble(Arc::new(transport), config, None))
    }

    /// Creates a client with explicit credentials.
    pub fn with_credentials(
        config: ClientConfig,
        credentials: Credentials,
    ) -> Result<Self, ClientInitError> {
        let transport = HttpTransport::new(config.timeout).context(ClientBuildSnafu)?;
        Ok(Self::assemble(Arc::new(transport), config, Some(credentials)))
    }

    /// Creates a client with credentials read from the environment.
    ///
    /// Reads `KUCOIN_API_KEY`, `KUCOIN_API_SECRET` and `KUCOIN_API_PASSPHRASE`.
    pub fn from_env(config: ClientConfig) -> Result<Self, ClientInitError> {
        let credentials = Credentials::from_env().context(MissingEnvVarSnafu)?;
        Self::with_credentials(config, credentials)
    }

    /// Creates a client over a caller-supplied transport.
    ///
    /// This is the seam used by the integration tests; production callers
    /// normally want [`Client::new`] or [`Client::from_env`].
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        credentials: Option<Credentials>,
    ) -> Self {
        Self::assemble(transport, config, credentials)
    }

    fn assemble(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        credentials: Option<Credentials>,
    ) -> Self {
        let base_url = if config.sandbox { SANDBOX_URL } else { LIVE_URL };
        Self {
            transport,
            credentials,
            base_url: base_url.to_string(),
            retry: config.retry,
        }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET and deserializes the envelope's `data` field.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        auth: Auth,
    ) -> Result<T, Error> {
        let request = self.build_request(Method::Get, path_and_query, None, auth)?;
        let response = self.transport.send(request).await?;
        decode_data(response)
    }

    /// Issues a POST with a JSON body and deserializes the envelope's `data`.
    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, Error> {
        let body = serde_json::to_string(body)
            .map_err(|error| Error::InvalidRequest(error.to_string()))?;
        let request = self.build_request(Method::Post, path, Some(body), auth)?;
        let response = self.transport.send(request).await?;
        decode_data(response)
    }

    fn build_request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<String>,
        auth: Auth,
    ) -> Result<ApiRequest, Error> {
        let headers = match auth {
            Auth::Public => Vec::new(),
            Auth::Private => {
                let credentials = self.credentials.as_ref().ok_or(Error::MissingCredentials)?;
                let timestamp_ms = Utc::now().timestamp_millis();
                credentials.sign(
                    method,
                    path_and_query,
                    body.as_deref().unwrap_or(""),
                    timestamp_ms,
                )
            }
        };

        Ok(ApiRequest {
            method,
            url: format!("{}{path_and_query}", self.base_url),
            headers,
            body,
        })
    }
}

/// Response envelope shared by every REST endpoint.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Envelope {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Decodes an envelope, surfacing HTTP and business-code failures.
pub(crate) fn decode_envelope(response: RawResponse) -> Result<Envelope, Error> {
    if !(200..300).contains(&response.status) {
        return Err(Error::Http {
            status: response.status,
        });
    }
    serde_json::from_value(response.body).map_err(|error| Error::Decode(error.to_string()))
}

fn decode_data<T: DeserializeOwned>(response: RawResponse) -> Result<T, Error> {
    let envelope = decode_envelope(response)?;
    if envelope.code != SUCCESS_CODE {
        return Err(Error::Api {
            code: envelope.code,
            message: envelope.msg.unwrap_or_default(),
        });
    }
    serde_json::from_value(envelope.data.unwrap_or(Value::Null))
        .map_err(|error| Error::Decode(error.to_string()))
}
