//! Public market-data endpoints.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::client::{Auth, Client};
use crate::endpoints::de;
use crate::errors::Error;

/// One tradable pair's listing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fee_currency: String,
    pub market: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub base_min_size: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub quote_min_size: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub base_increment: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub quote_increment: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price_increment: f64,
    pub enable_trading: bool,
    pub is_margin_enabled: bool,
}

/// 24-hour rolling statistics for one pair.
///
/// Prices are `None` for pairs that have not traded in the window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub symbol: String,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub buy: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub sell: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub last: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub change_rate: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub change_price: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub vol: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub vol_value: Option<f64>,
    #[serde(deserialize_with = "de::datetime_from_millis")]
    pub time: DateTime<Utc>,
}

/// Snapshot of every pair's ticker, as served by the all-tickers endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AllTickers {
    #[serde(deserialize_with = "de::datetime_from_millis")]
    pub time: DateTime<Utc>,
    pub ticker: Vec<TickerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerEntry {
    pub symbol: String,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub buy: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub sell: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub last: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub vol: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub vol_value: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub change_rate: Option<f64>,
}

/// Best bid/ask snapshot from the level-1 order book.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level1Quote {
    pub sequence: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub size: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub best_bid: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub best_bid_size: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub best_ask: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub best_ask_size: f64,
    #[serde(deserialize_with = "de::datetime_from_millis")]
    pub time: DateTime<Utc>,
}

/// One public fill from the recent-trades tape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFill {
    pub sequence: String,
    pub side: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub size: f64,
    /// Fill time in nanoseconds since the epoch, as served.
    pub time: i64,
}

impl Client {
    /// Lists every trading pair with its trade-execution parameters.
    pub async fn symbols(&self) -> Result<Vec<SymbolInfo>, Error> {
        self.get("/api/v1/symbols", Auth::Public).await
    }

    /// 24-hour statistics for one pair.
    pub async fn stats(&self, symbol: &str) -> Result<MarketStats, Error> {
        let path = format!("/api/v1/market/stats?symbol={}", symbol.to_uppercase());
        self.get(&path, Auth::Public).await
    }

    /// Ticker snapshot for every listed pair.
    pub async fn all_tickers(&self) -> Result<AllTickers, Error> {
        self.get("/api/v1/market/allTickers", Auth::Public).await
    }

    /// Best bid/ask for one pair.
    pub async fn level1_quote(&self, symbol: &str) -> Result<Level1Quote, Error> {
        let path = format!(
            "/api/v1/market/orderbook/level1?symbol={}",
            symbol.to_uppercase()
        );
        self.get(&path, Auth::Public).await
    }

    /// The most recent public fills for one pair.
    pub async fn trade_histories(&self, symbol: &str) -> Result<Vec<TradeFill>, Error> {
        let path = format!("/api/v1/market/histories?symbol={}", symbol.to_uppercase());
        self.get(&path, Auth::Public).await
    }

    /// The exchange's clock, to millisecond precision.
    ///
    /// Orders stamped more than a few seconds behind this clock are rejected,
    /// so callers submitting trades should sync against it rather than local
    /// time.
    pub async fn server_time(&self) -> Result<DateTime<Utc>, Error> {
        let millis: i64 = self.get("/api/v1/timestamp", Auth::Public).await?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| Error::Decode(format!("timestamp out of range: {millis}")))
    }
}
