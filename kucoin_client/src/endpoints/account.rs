//! Private account endpoints.

use serde::{Deserialize, Serialize};

use crate::client::{Auth, Client};
use crate::endpoints::de;
use crate::errors::Error;

/// Ledger the exchange splits balances across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Main,
    Trade,
    Margin,
}

impl AccountType {
    const fn as_str(self) -> &'static str {
        match self {
            AccountType::Main => "main",
            AccountType::Trade => "trade",
            AccountType::Margin => "margin",
        }
    }
}

/// One currency balance bucket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub balance: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub available: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub holds: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAccount {
    pub id: String,
}

#[derive(Serialize)]
struct CreateAccountPayload<'a> {
    currency: &'a str,
    #[serde(rename = "type")]
    kind: AccountType,
}

impl Client {
    /// Lists open accounts, optionally restricted by currency and ledger.
    pub async fn accounts(
        &self,
        currency: Option<&str>,
        kind: Option<AccountType>,
    ) -> Result<Vec<Account>, Error> {
        let mut path = "/api/v1/accounts".to_string();
        let mut separator = '?';
        if let Some(currency) = currency {
            path.push_str(&format!("{separator}currency={}", currency.to_uppercase()));
            separator = '&';
        }
        if let Some(kind) = kind {
            path.push_str(&format!("{separator}type={}", kind.as_str()));
        }
        self.get(&path, Auth::Private).await
    }

    /// Opens a new account of the given ledger type for a currency.
    pub async fn create_account(
        &self,
        currency: &str,
        kind: AccountType,
    ) -> Result<CreatedAccount, Error> {
        let currency = currency.to_uppercase();
        let payload = CreateAccountPayload {
            currency: &currency,
            kind,
        };
        self.post("/api/v1/accounts", &payload, Auth::Private).await
    }
}
