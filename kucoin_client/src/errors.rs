use thiserror::Error;

use crate::client::transport::TransportError;
use crate::models::bar::BarParseError;
use crate::models::interval::IntervalError;
use crate::models::range::RangeError;

/// The unified error type for the `kucoin_client` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested bar interval is not one the exchange offers.
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// The requested time range is empty or inverted.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// The request was malformed before any network traffic happened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The exchange does not list the requested trading pair.
    #[error("unknown trading pair: {symbol}")]
    UnknownSymbol {
        /// The pair the exchange rejected.
        symbol: String,
    },

    /// The exchange answered with a non-success business code.
    #[error("exchange error {code}: {message}")]
    Api {
        /// Exchange status code from the response envelope.
        code: String,
        /// Human-readable message supplied by the exchange, if any.
        message: String,
    },

    /// The server answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },

    /// The server kept rate-limiting until the retry budget ran out.
    #[error("server unresponsive after {attempts} rate-limited retries")]
    ServerUnresponsive { attempts: u32 },

    /// A transport-level failure that survived the reconnect retry.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A candle row carried a field that could not be parsed as numeric.
    #[error(transparent)]
    Candle(#[from] BarParseError),

    /// The response body did not match the documented shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// A private endpoint was called on a client built without credentials.
    #[error("endpoint requires API credentials")]
    MissingCredentials,
}
