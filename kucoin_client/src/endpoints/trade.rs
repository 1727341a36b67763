//! Private trading endpoints for the spot trade account.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::client::{Auth, Client};
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Time-in-force flavors the order endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    Gtc,
    Gtt,
    Ioc,
    Fok,
}

/// Self-trade prevention behavior, mostly used by market makers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelfTradePrevention {
    Cn,
    Co,
    Cb,
    Dc,
}

/// How much to trade: base-currency size or quote-currency funds.
///
/// The exchange requires exactly one of the two, so the choice is a sum
/// type rather than a pair of optional fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderQuantity {
    /// Amount of base currency to buy or sell.
    Size(f64),
    /// Amount of quote currency to spend or receive.
    Funds(f64),
}

impl OrderQuantity {
    fn split(self) -> (Option<f64>, Option<f64>) {
        match self {
            OrderQuantity::Size(size) => (Some(size), None),
            OrderQuantity::Funds(funds) => (None, Some(funds)),
        }
    }
}

/// Parameters for a limit order.
#[derive(Debug, Clone)]
pub struct LimitOrder {
    pub symbol: String,
    pub side: OrderSide,
    /// Execute at this price or better.
    pub price: f64,
    pub quantity: OrderQuantity,
    /// Caller-chosen idempotency id; a timestamp nonce when `None`.
    pub client_oid: Option<String>,
    pub remark: Option<String>,
    pub time_in_force: TimeInForce,
    /// Cancel after this many seconds; requires `TimeInForce::Gtt`.
    pub cancel_after: Option<u64>,
    /// Reject the order instead of taking liquidity.
    pub post_only: bool,
    /// Keep the order out of the public book.
    pub hidden: bool,
    pub stp: Option<SelfTradePrevention>,
}

impl LimitOrder {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        price: f64,
        quantity: OrderQuantity,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            price,
            quantity,
            client_oid: None,
            remark: None,
            time_in_force: TimeInForce::Gtc,
            cancel_after: None,
            post_only: false,
            hidden: false,
            stp: None,
        }
    }
}

/// Parameters for a market order.
#[derive(Debug, Clone)]
pub struct MarketOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: OrderQuantity,
    pub client_oid: Option<String>,
    pub remark: Option<String>,
    pub stp: Option<SelfTradePrevention>,
}

impl MarketOrder {
    pub fn new(symbol: impl Into<String>, side: OrderSide, quantity: OrderQuantity) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            client_oid: None,
            remark: None,
            stp: None,
        }
    }
}

/// Exchange acknowledgement carrying the new order id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
}

/// The wire shape both order flavors serialize into.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderPayload {
    symbol: String,
    side: OrderSide,
    #[serde(rename = "type")]
    kind: &'static str,
    client_oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    funds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stp: Option<SelfTradePrevention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remark: Option<String>,
}

fn nonce() -> String {
    Utc::now().timestamp_millis().to_string()
}

pub(crate) fn limit_payload(order: LimitOrder) -> OrderPayload {
    let (size, funds) = order.quantity.split();
    OrderPayload {
        symbol: order.symbol.to_uppercase(),
        side: order.side,
        kind: "limit",
        client_oid: order.client_oid.unwrap_or_else(nonce),
        price: Some(order.price),
        size,
        funds,
        time_in_force: Some(order.time_in_force),
        cancel_after: order.cancel_after,
        post_only: order.post_only.then_some(true),
        hidden: order.hidden.then_some(true),
        stp: order.stp,
        remark: order.remark,
    }
}

pub(crate) fn market_payload(order: MarketOrder) -> OrderPayload {
    let (size, funds) = order.quantity.split();
    OrderPayload {
        symbol: order.symbol.to_uppercase(),
        side: order.side,
        kind: "market",
        client_oid: order.client_oid.unwrap_or_else(nonce),
        price: None,
        size,
        funds,
        time_in_force: None,
        cancel_after: None,
        post_only: None,
        hidden: None,
        stp: order.stp,
        remark: order.remark,
    }
}

impl Client {
    /// Places a limit order in the trade account.
    pub async fn limit_order(&self, order: LimitOrder) -> Result<OrderAck, Error> {
        let payload = limit_payload(order);
        self.post("/api/v1/orders", &payload, Auth::Private).await
    }

    /// Places a market order in the trade account.
    pub async fn market_order(&self, order: MarketOrder) -> Result<OrderAck, Error> {
        let payload = market_payload(order);
        self.post("/api/v1/orders", &payload, Auth::Private).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_payload_keeps_exactly_one_quantity_field() {
        let order = LimitOrder::new(
            "btc-usdt",
            OrderSide::Buy,
            30_000.0,
            OrderQuantity::Size(0.5),
        );

        let json = serde_json::to_value(limit_payload(order)).unwrap();

        assert_eq!(json["symbol"], "BTC-USDT");
        assert_eq!(json["type"], "limit");
        assert_eq!(json["size"], 0.5);
        assert!(json.get("funds").is_none());
        assert_eq!(json["timeInForce"], "GTC");
        assert!(json.get("postOnly").is_none());
    }

    #[test]
    fn market_payload_omits_limit_only_fields() {
        let order = MarketOrder::new("eth-usdt", OrderSide::Sell, OrderQuantity::Funds(250.0));

        let json = serde_json::to_value(market_payload(order)).unwrap();

        assert_eq!(json["type"], "market");
        assert_eq!(json["funds"], 250.0);
        assert!(json.get("price").is_none());
        assert!(json.get("timeInForce").is_none());
    }
}
