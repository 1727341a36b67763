//! Deserialization helpers for the exchange's numeric-as-string wire fields.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Flexible {
    Number(f64),
    Text(String),
}

impl Flexible {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Flexible::Number(n) => Ok(n),
            Flexible::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("not a numeric string: {s}"))),
        }
    }
}

/// Accepts a JSON number or a numeric string; anything else is an error.
pub(crate) fn f64_flexible<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Flexible::deserialize(deserializer)?.into_f64()
}

/// Like [`f64_flexible`], but maps `null` (or an absent field with
/// `#[serde(default)]`) to `None`.
pub(crate) fn opt_f64_flexible<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Flexible>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value.into_f64().map(Some),
    }
}

/// Millisecond unix epoch to `DateTime<Utc>`.
pub(crate) fn datetime_from_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = i64::deserialize(deserializer)?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
}
