//! Canonical in-memory representation of one OHLCV(+turnover) candle.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

/// A candle row on the wire could not be converted into a [`Bar`].
///
/// Conversion failures are fatal to the whole query; a row is never silently
/// skipped or coerced to a default.
#[derive(Debug, Error)]
pub enum BarParseError {
    #[error("candle row has {got} fields, expected {expected}")]
    RowLength { expected: usize, got: usize },

    #[error("candle field `{field}` is not numeric: {value}")]
    NonNumeric { field: &'static str, value: String },

    #[error("candle field `time` is not a unix timestamp: {value}")]
    BadTimestamp { value: String },
}

/// A single candle for one bar interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Opening time of the bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Closing price.
    pub close: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Volume traded during the bar interval, in base currency.
    pub volume: f64,

    /// Turnover during the bar interval, in quote currency.
    pub turnover: f64,
}

/// Fixed wire column order: `[time, open, close, high, low, volume, turnover]`.
const WIRE_FIELDS: usize = 7;

impl Bar {
    /// Parses one fixed-position candle row as served by the kline endpoint.
    ///
    /// `time` is integer seconds since the epoch; the price and volume fields
    /// arrive as strings or raw numbers and must all parse as floating point.
    pub(crate) fn from_wire_row(row: &[Value]) -> Result<Self, BarParseError> {
        if row.len() < WIRE_FIELDS {
            return Err(BarParseError::RowLength {
                expected: WIRE_FIELDS,
                got: row.len(),
            });
        }

        let seconds = int_field(&row[0])?;
        let timestamp = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| BarParseError::BadTimestamp {
                value: row[0].to_string(),
            })?;

        Ok(Self {
            timestamp,
            open: float_field(&row[1], "open")?,
            close: float_field(&row[2], "close")?,
            high: float_field(&row[3], "high")?,
            low: float_field(&row[4], "low")?,
            volume: float_field(&row[5], "volume")?,
            turnover: float_field(&row[6], "turnover")?,
        })
    }
}

fn float_field(value: &Value, field: &'static str) -> Result<f64, BarParseError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| BarParseError::NonNumeric {
        field,
        value: value.to_string(),
    })
}

fn int_field(value: &Value) -> Result<i64, BarParseError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed.ok_or_else(|| BarParseError::BadTimestamp {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(values: Value) -> Vec<Value> {
        values.as_array().unwrap().clone()
    }

    #[test]
    fn parses_string_encoded_rows() {
        let bar = Bar::from_wire_row(&row(json!([
            "1609459200", "29000.1", "29100.2", "29300.0", "28900.5", "12.5", "364000.8"
        ])))
        .unwrap();

        assert_eq!(bar.timestamp, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(bar.open, 29000.1);
        assert_eq!(bar.close, 29100.2);
        assert_eq!(bar.high, 29300.0);
        assert_eq!(bar.low, 28900.5);
        assert_eq!(bar.volume, 12.5);
        assert_eq!(bar.turnover, 364000.8);
    }

    #[test]
    fn parses_raw_number_rows() {
        let bar = Bar::from_wire_row(&row(json!([
            1609459200, 29000.1, 29100.2, 29300.0, 28900.5, 12.5, 364000.8
        ])))
        .unwrap();

        assert_eq!(bar.open, 29000.1);
        assert_eq!(bar.volume, 12.5);
    }

    #[test]
    fn non_numeric_field_is_fatal_and_named() {
        let err = Bar::from_wire_row(&row(json!([
            "1609459200", "29000.1", "oops", "29300.0", "28900.5", "12.5", "364000.8"
        ])))
        .unwrap_err();

        match err {
            BarParseError::NonNumeric { field, value } => {
                assert_eq!(field, "close");
                assert!(value.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = Bar::from_wire_row(&row(json!(["1609459200", "1", "2"]))).unwrap_err();
        assert!(matches!(err, BarParseError::RowLength { got: 3, .. }));
    }

    #[test]
    fn non_integer_timestamp_is_rejected() {
        let err = Bar::from_wire_row(&row(json!([
            true, "1", "2", "3", "4", "5", "6"
        ])))
        .unwrap_err();
        assert!(matches!(err, BarParseError::BadTimestamp { .. }));
    }
}
