//! One paginated kline call, with the retry and backoff policy applied.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::client::transport::{ApiRequest, Method, RawResponse, Transport};
use crate::client::{Envelope, INVALID_SYMBOL_CODE, SUCCESS_CODE, decode_envelope};
use crate::errors::Error;
use crate::models::bar::Bar;
use crate::models::interval::Interval;
use crate::models::range::TimeRange;

/// Failure-handling tunables for paginated candle queries.
///
/// These are policy, not contract: the defaults match the exchange's
/// observed behavior, and tests shrink the waits to zero.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base of the exponential rate-limit backoff; retry `n` waits
    /// `backoff_base ^ n` seconds.
    pub backoff_base: f64,
    /// Rate-limited retries allowed before the call is declared
    /// unresponsive.
    pub max_rate_limit_retries: u32,
    /// Cool-down before the single reconnect retry that follows a dropped
    /// connection or read timeout.
    pub reconnect_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_base: 2.0,
            max_rate_limit_retries: 7,
            reconnect_cooldown: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    fn backoff_delay(&self, retry: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_base.max(0.0).powi(retry as i32))
    }
}

/// Result of one fetch for one sub-range.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Page {
    /// The sub-range held data.
    Bars(Vec<Bar>),
    /// The symbol has no bars in or before the sub-range; the walk stops.
    End,
}

/// Issues one kline request per sub-range against the public candle endpoint.
pub(crate) struct PageFetcher<'a> {
    transport: &'a dyn Transport,
    policy: &'a RetryPolicy,
    base_url: &'a str,
}

impl<'a> PageFetcher<'a> {
    pub(crate) fn new(
        transport: &'a dyn Transport,
        policy: &'a RetryPolicy,
        base_url: &'a str,
    ) -> Self {
        Self {
            transport,
            policy,
            base_url,
        }
    }

    /// Fetches the candles for one sub-range, retrying transient failures.
    ///
    /// A dropped connection or read timeout earns one cool-down, a transport
    /// reset, and a single retry. A 429 backs off exponentially up to the
    /// policy cap; exhausting the cap is fatal. The retry counter lives on
    /// this call's stack, so an unrelated later call always starts fresh.
    pub(crate) async fn fetch(
        &self,
        symbol: &str,
        range: &TimeRange,
        interval: Interval,
    ) -> Result<Page, Error> {
        let request = ApiRequest {
            method: Method::Get,
            url: format!(
                "{}/api/v1/market/candles?type={}&symbol={}&startAt={}&endAt={}",
                self.base_url,
                interval,
                symbol,
                range.start().timestamp(),
                range.end().timestamp(),
            ),
            headers: Vec::new(),
            body: None,
        };

        let mut rate_limited_retries: u32 = 0;
        let mut reconnected = false;
        loop {
            let response = match self.transport.send(request.clone()).await {
                Ok(response) => response,
                Err(error) if error.is_recoverable() && !reconnected => {
                    debug!(
                        %error,
                        cooldown_secs = self.policy.reconnect_cooldown.as_secs(),
                        "transport failure; cooling down before reconnect"
                    );
                    tokio::time::sleep(self.policy.reconnect_cooldown).await;
                    self.transport.reset();
                    reconnected = true;
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            if response.status == 429 {
                if rate_limited_retries >= self.policy.max_rate_limit_retries {
                    return Err(Error::ServerUnresponsive {
                        attempts: rate_limited_retries,
                    });
                }
                rate_limited_retries += 1;
                let delay = self.policy.backoff_delay(rate_limited_retries);
                debug!(
                    symbol,
                    retry = rate_limited_retries,
                    delay_secs = delay.as_secs_f64(),
                    "rate limited; backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return classify(symbol, response);
        }
    }
}

/// Sorts a settled response into data, end-of-series, or an error.
///
/// An empty or missing `data` array on a success code is the normal
/// end-of-series signal, distinct from the invalid-symbol business code,
/// which is a caller error.
fn classify(symbol: &str, response: RawResponse) -> Result<Page, Error> {
    let envelope: Envelope = decode_envelope(response)?;

    match envelope.code.as_str() {
        SUCCESS_CODE => {}
        INVALID_SYMBOL_CODE => {
            return Err(Error::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        _ => {
            return Err(Error::Api {
                code: envelope.code,
                message: envelope.msg.unwrap_or_default(),
            });
        }
    }

    let rows: Vec<Vec<Value>> = match envelope.data {
        None | Some(Value::Null) => return Ok(Page::End),
        Some(value) => {
            serde_json::from_value(value).map_err(|error| Error::Decode(error.to_string()))?
        }
    };
    if rows.is_empty() {
        return Ok(Page::End);
    }

    let bars = rows
        .iter()
        .map(|row| Bar::from_wire_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::Bars(bars))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ok_response(body: Value) -> RawResponse {
        RawResponse { status: 200, body }
    }

    #[test]
    fn empty_data_array_is_end_of_series_not_an_error() {
        let page = classify("BTC-USDT", ok_response(json!({"code": "200000", "data": []})));
        assert_eq!(page.unwrap(), Page::End);
    }

    #[test]
    fn null_data_is_end_of_series() {
        let page = classify(
            "BTC-USDT",
            ok_response(json!({"code": "200000", "data": null})),
        );
        assert_eq!(page.unwrap(), Page::End);
    }

    #[test]
    fn invalid_symbol_code_is_a_caller_error() {
        let err = classify(
            "NOPE-USDT",
            ok_response(json!({"code": "400100", "msg": "This pair is not provided at present"})),
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownSymbol { symbol } if symbol == "NOPE-USDT"));
    }

    #[test]
    fn other_business_codes_surface_as_api_errors() {
        let err = classify(
            "BTC-USDT",
            ok_response(json!({"code": "400005", "msg": "Invalid KC-API-SIGN"})),
        )
        .unwrap_err();

        match err {
            Error::Api { code, message } => {
                assert_eq!(code, "400005");
                assert_eq!(message, "Invalid KC-API-SIGN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rows_parse_into_bars() {
        let page = classify(
            "BTC-USDT",
            ok_response(json!({
                "code": "200000",
                "data": [
                    ["1609545600", "29400.0", "29600.0", "29700.0", "29300.0", "2.0", "59000.0"],
                    ["1609459200", "29000.0", "29400.0", "29500.0", "28900.0", "1.5", "43800.0"]
                ]
            })),
        )
        .unwrap();

        match page {
            Page::Bars(bars) => {
                assert_eq!(bars.len(), 2);
                assert_eq!(bars[0].open, 29400.0);
            }
            Page::End => panic!("expected data"),
        }
    }

    #[test]
    fn backoff_delay_grows_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(8));
    }
}
