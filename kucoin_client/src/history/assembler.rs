//! Merges fetched pages into one ordered, deduplicated series.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::history::fetcher::Page;
use crate::models::bar::Bar;
use crate::models::interval::Interval;
use crate::models::series::Series;

/// Folds the fetched pages into a single series for one symbol.
///
/// Bars are keyed by timestamp; when adjacent pages both return the shared
/// boundary bar, the first appearance wins. The output is strictly ordered
/// by timestamp in the requested direction. No pages, or only end-of-series
/// pages, yield an empty series.
pub(crate) fn assemble(
    symbol: &str,
    interval: Interval,
    pages: Vec<Page>,
    ascending: bool,
) -> Series {
    let mut by_timestamp: BTreeMap<DateTime<Utc>, Bar> = BTreeMap::new();
    for page in pages {
        let Page::Bars(bars) = page else { continue };
        for bar in bars {
            by_timestamp.entry(bar.timestamp).or_insert(bar);
        }
    }

    let mut bars: Vec<Bar> = by_timestamp.into_values().collect();
    if !ascending {
        bars.reverse();
    }

    Series {
        symbol: symbol.to_string(),
        interval,
        bars,
    }
}
