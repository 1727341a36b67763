#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kucoin_client::client::transport::{
    ApiRequest, ConnectSnafu, RawResponse, RequestSnafu, TimeoutSnafu, Transport, TransportError,
};
use kucoin_client::{Client, ClientConfig, Credentials, RetryPolicy};
use serde_json::{Value, json};

/// One scripted transport outcome.
pub enum Step {
    Respond(u16, Value),
    ConnectError,
    TimeoutError,
}

/// A transport that replays a script and records everything sent through it.
pub struct MockTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ApiRequest>>,
    resets: AtomicUsize,
}

impl MockTransport {
    pub fn scripted(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
        }
    }

    /// Appends another step; lets a test continue after the script drained.
    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Respond(status, body)) => Ok(RawResponse { status, body }),
            Some(Step::ConnectError) => Err(ConnectSnafu {
                message: "connection reset by peer".to_string(),
            }
            .build()),
            Some(Step::TimeoutError) => Err(TimeoutSnafu {
                message: "operation timed out".to_string(),
            }
            .build()),
            None => Err(RequestSnafu {
                message: "mock script exhausted".to_string(),
            }
            .build()),
        }
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// The production policy with every wait shrunk to zero.
pub fn zero_wait_policy() -> RetryPolicy {
    RetryPolicy {
        backoff_base: 0.0,
        max_rate_limit_retries: 7,
        reconnect_cooldown: Duration::ZERO,
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        retry: zero_wait_policy(),
        ..ClientConfig::default()
    }
}

pub fn public_client(transport: std::sync::Arc<MockTransport>) -> Client {
    Client::with_transport(transport, test_config(), None)
}

pub fn private_client(transport: std::sync::Arc<MockTransport>) -> Client {
    Client::with_transport(
        transport,
        test_config(),
        Some(Credentials::new("test-key", "test-secret", "test-passphrase")),
    )
}

/// One candle row in wire order: time, open, close, high, low, volume, turnover.
pub fn candle_row(time_secs: i64, close: f64) -> Value {
    json!([
        time_secs.to_string(),
        "100.0",
        close.to_string(),
        "110.0",
        "90.0",
        "5.0",
        "500.0"
    ])
}

pub fn candles_ok(rows: Vec<Value>) -> Step {
    Step::Respond(200, json!({ "code": "200000", "data": rows }))
}

pub fn end_of_series() -> Step {
    Step::Respond(200, json!({ "code": "200000", "data": [] }))
}

pub fn rate_limited() -> Step {
    Step::Respond(429, Value::Null)
}
