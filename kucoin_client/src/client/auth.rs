//! Request signing for private endpoints.
//!
//! The exchange authenticates a call from five headers: the API key, an
//! HMAC-SHA256 signature over `timestamp + METHOD + path + body`, the
//! millisecond timestamp, the HMAC-encrypted passphrase, and the key
//! version. Only endpoints flagged private are signed; the public kline
//! endpoint never is.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use shared_utils::env::{self, MissingEnvVarError};

use crate::client::transport::Method;

type HmacSha256 = Hmac<Sha256>;

const API_KEY_VAR: &str = "KUCOIN_API_KEY";
const API_SECRET_VAR: &str = "KUCOIN_API_SECRET";
const API_PASSPHRASE_VAR: &str = "KUCOIN_API_PASSPHRASE";

/// API credentials for key version 2.
pub struct Credentials {
    api_key: SecretString,
    api_secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().into()),
            api_secret: SecretString::new(api_secret.into().into()),
            passphrase: SecretString::new(passphrase.into().into()),
        }
    }

    /// Reads credentials from the `KUCOIN_API_KEY`, `KUCOIN_API_SECRET` and
    /// `KUCOIN_API_PASSPHRASE` environment variables.
    pub fn from_env() -> Result<Self, MissingEnvVarError> {
        Ok(Self::new(
            env::require(API_KEY_VAR)?,
            env::require(API_SECRET_VAR)?,
            env::require(API_PASSPHRASE_VAR)?,
        ))
    }

    /// Produces the `KC-API-*` headers for one request.
    ///
    /// `path_and_query` must be the exact request target including the query
    /// string, and `body` the exact bytes sent, or the server rejects the
    /// signature.
    pub(crate) fn sign(
        &self,
        method: Method,
        path_and_query: &str,
        body: &str,
        timestamp_ms: i64,
    ) -> Vec<(String, String)> {
        let prehash = format!("{timestamp_ms}{}{path_and_query}{body}", method.as_str());
        let signature = BASE64.encode(self.digest(prehash.as_bytes()));
        let passphrase = BASE64.encode(self.digest(self.passphrase.expose_secret().as_bytes()));

        vec![
            ("KC-API-KEY".to_string(), self.api_key.expose_secret().to_string()),
            ("KC-API-SIGN".to_string(), signature),
            ("KC-API-TIMESTAMP".to_string(), timestamp_ms.to_string()),
            ("KC-API-PASSPHRASE".to_string(), passphrase),
            ("KC-API-KEY-VERSION".to_string(), "2".to_string()),
        ]
    }

    fn digest(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }
}
