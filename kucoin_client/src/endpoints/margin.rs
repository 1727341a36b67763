//! Margin account and lending-market endpoints.

use serde::{Deserialize, Serialize};

use crate::client::{Auth, Client};
use crate::endpoints::de;
use crate::endpoints::trade::{LimitOrder, limit_payload};
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    Cross,
    Isolated,
}

/// Aggregate margin position across all currencies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAccount {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub debt_ratio: f64,
    pub accounts: Vec<MarginBalance>,
}

/// One currency's margin balances and borrowing headroom.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginBalance {
    pub currency: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub total_balance: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub available_balance: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub hold_balance: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub liability: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub max_borrow_size: f64,
}

/// One open offer in the lending market.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingRate {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub daily_int_rate: f64,
    /// Loan term in days.
    pub term: u32,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub size: f64,
}

/// Acknowledgement for a margin order, including any borrow the exchange
/// opened to fill it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginOrderAck {
    pub order_id: String,
    #[serde(default, deserialize_with = "de::opt_f64_flexible")]
    pub borrow_size: Option<f64>,
    #[serde(default)]
    pub loan_apply_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarginOrderPayload {
    #[serde(flatten)]
    order: crate::endpoints::trade::OrderPayload,
    margin_model: MarginMode,
    auto_borrow: bool,
}

impl Client {
    /// The margin account overview: debt ratio plus per-currency balances.
    pub async fn margin_account(&self) -> Result<MarginAccount, Error> {
        self.get("/api/v1/margin/account", Auth::Private).await
    }

    /// Open lending-market offers for a currency, optionally for one term.
    pub async fn lending_rates(
        &self,
        currency: &str,
        term_days: Option<u32>,
    ) -> Result<Vec<LendingRate>, Error> {
        let mut path = format!("/api/v1/margin/market?currency={}", currency.to_uppercase());
        if let Some(term) = term_days {
            path.push_str(&format!("&term={term}"));
        }
        self.get(&path, Auth::Public).await
    }

    /// Places a limit order against the margin account.
    pub async fn margin_limit_order(
        &self,
        order: LimitOrder,
        mode: MarginMode,
        auto_borrow: bool,
    ) -> Result<MarginOrderAck, Error> {
        let payload = MarginOrderPayload {
            order: limit_payload(order),
            margin_model: mode,
            auto_borrow,
        };
        self.post("/api/v1/margin/order", &payload, Auth::Private)
            .await
    }
}
