//! Historical-candle retrieval: pagination planning, fetching with retry,
//! and per-symbol series assembly.
//!
//! The kline endpoint caps each call at 1500 bars, so a wide query is split
//! into sub-ranges and walked one call at a time, newest range first. The
//! walk for a symbol stops at the first empty page: the server returns empty
//! data only when nothing exists at or before the requested window, so every
//! remaining (older) sub-range would be empty too.

mod assembler;
mod fetcher;
mod planner;

pub use fetcher::RetryPolicy;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::warn;

use crate::client::Client;
use crate::errors::Error;
use crate::history::assembler::assemble;
use crate::history::fetcher::{Page, PageFetcher};
use crate::history::planner::{MAX_BARS_PER_CALL, plan};
use crate::models::interval::Interval;
use crate::models::range::TimeRange;
use crate::models::series::Series;
use crate::models::symbols::Symbols;

/// Parameters for one historical-candle query.
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    /// One trading pair or a list of them.
    pub symbols: Symbols,
    /// Earliest time of the queried window (UTC).
    pub start: DateTime<Utc>,
    /// Latest time of the queried window; `None` means "now".
    pub end: Option<DateTime<Utc>>,
    /// Bar granularity.
    pub interval: Interval,
    /// `true` orders each series oldest bar first.
    pub ascending: bool,
    /// Warn when the query needs more than this many calls; `None` disables
    /// the advisory. It never blocks execution either way.
    pub warn_threshold: Option<u32>,
}

impl HistoryRequest {
    pub fn new(symbols: impl Into<Symbols>, start: DateTime<Utc>, interval: Interval) -> Self {
        Self {
            symbols: symbols.into(),
            start,
            end: None,
            interval,
            ascending: true,
            warn_threshold: Some(20),
        }
    }
}

/// Candle query result: a bare series when exactly one symbol was requested,
/// a symbol-keyed mapping (in request order) otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryResult {
    Single(Series),
    Multi(IndexMap<String, Series>),
}

impl HistoryResult {
    /// The bare series, if exactly one symbol was requested.
    pub fn into_single(self) -> Option<Series> {
        match self {
            HistoryResult::Single(series) => Some(series),
            HistoryResult::Multi(_) => None,
        }
    }

    /// Looks up one symbol's series in either result shape.
    pub fn get(&self, symbol: &str) -> Option<&Series> {
        match self {
            HistoryResult::Single(series) if series.symbol == symbol => Some(series),
            HistoryResult::Single(_) => None,
            HistoryResult::Multi(map) => map.get(symbol),
        }
    }
}

impl Client {
    /// Queries historic OHLCV candles for one or more trading pairs.
    ///
    /// The full window is split into as many calls as the server's per-call
    /// bar cap requires and walked backwards in time per symbol, stopping
    /// early once the exchange reports no more history. Transient failures
    /// (rate limiting, dropped connections, read timeouts) are retried per
    /// the client's [`RetryPolicy`]; an unknown trading pair fails the whole
    /// call. Each returned series is ordered per `ascending` and free of
    /// duplicate timestamps.
    pub async fn ohlcv(&self, request: HistoryRequest) -> Result<HistoryResult, Error> {
        let symbols = request.symbols.normalize();
        if symbols.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one symbol is required".to_string(),
            ));
        }

        let end = request.end.unwrap_or_else(Utc::now);
        let full_range = TimeRange::new(request.start, end)?;
        let call_plan = plan(&full_range, request.interval, MAX_BARS_PER_CALL);

        if let Some(threshold) = request.warn_threshold {
            let calls = call_plan.len() * symbols.len();
            if calls > threshold as usize {
                warn!(
                    calls,
                    "candle query spans many paginated requests; expect rate-limit pauses"
                );
            }
        }

        let fetcher = PageFetcher::new(self.transport(), self.retry_policy(), self.base_url());
        let mut series_by_symbol: IndexMap<String, Series> =
            IndexMap::with_capacity(symbols.len());
        for symbol in &symbols {
            let mut pages = Vec::with_capacity(call_plan.len());
            for sub_range in &call_plan {
                match fetcher.fetch(symbol, sub_range, request.interval).await? {
                    // Nothing exists at or before this sub-range; the
                    // remaining entries are older still, so skip them.
                    Page::End => break,
                    page => pages.push(page),
                }
            }
            let series = assemble(symbol, request.interval, pages, request.ascending);
            series_by_symbol.insert(symbol.clone(), series);
        }

        if series_by_symbol.len() == 1 {
            if let Some((_, series)) = series_by_symbol.shift_remove_index(0) {
                return Ok(HistoryResult::Single(series));
            }
        }
        Ok(HistoryResult::Multi(series_by_symbol))
    }
}
