//! A merged candle series for a single trading pair.

use crate::models::bar::Bar;
use crate::models::interval::Interval;

/// The complete candle history returned for one symbol over one query.
///
/// Bars are strictly ordered by timestamp (direction chosen by the caller)
/// with no duplicate timestamps. An empty `bars` list is a valid answer: it
/// means the symbol has no data in or before the requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// The trading pair this series describes (e.g. "BTC-USDT").
    pub symbol: String,
    /// The bar granularity of every candle in the series.
    pub interval: Interval,
    /// The candles, deduplicated and ordered by timestamp.
    pub bars: Vec<Bar>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
