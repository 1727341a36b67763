//! Splits a candle query into per-call sub-ranges under the server cap.

use chrono::Duration;

use crate::models::interval::Interval;
use crate::models::range::TimeRange;

/// Most bars the kline endpoint returns in one call.
pub(crate) const MAX_BARS_PER_CALL: i64 = 1_500;

/// Partitions `range` into the sub-ranges the pagination walk will request.
///
/// The returned plan is in walk order: the most recent sub-range first,
/// proceeding backwards in time. Every sub-range except the last spans
/// exactly `max_bars_per_call` bars; the final, chronologically earliest
/// sub-range absorbs the remainder. Consecutive entries meet exactly, so the
/// plan covers `range` with no gap and no overlap.
pub(crate) fn plan(
    range: &TimeRange,
    interval: Interval,
    max_bars_per_call: i64,
) -> Vec<TimeRange> {
    let chunk_minutes = max_bars_per_call * i64::from(interval.minutes());
    if range.duration_minutes() <= chunk_minutes {
        return vec![*range];
    }

    let chunk = Duration::minutes(chunk_minutes);
    let mut sub_ranges = Vec::new();
    let mut end = range.end();
    loop {
        let start = end - chunk;
        if start <= range.start() {
            sub_ranges.push(TimeRange::from_parts(range.start(), end));
            break;
        }
        sub_ranges.push(TimeRange::from_parts(start, end));
        end = start;
    }
    sub_ranges
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn nine_daily_bars_fit_in_one_call() {
        let range = TimeRange::new(at(2021, 1, 1), at(2021, 1, 10)).unwrap();

        let sub_ranges = plan(&range, Interval::OneDay, MAX_BARS_PER_CALL);

        assert_eq!(sub_ranges, vec![range]);
    }

    #[test]
    fn three_years_of_minutes_walk_backwards_in_full_chunks() {
        let range = TimeRange::new(at(2019, 1, 1), at(2022, 1, 1)).unwrap();

        let sub_ranges = plan(&range, Interval::OneMinute, MAX_BARS_PER_CALL);

        assert!(sub_ranges.len() > 1);
        // Walk order: newest first.
        assert_eq!(sub_ranges[0].end(), range.end());
        assert_eq!(sub_ranges[sub_ranges.len() - 1].start(), range.start());
        // Every sub-range except the earliest spans exactly the cap.
        for sub_range in &sub_ranges[..sub_ranges.len() - 1] {
            assert_eq!(sub_range.duration_minutes(), MAX_BARS_PER_CALL);
        }
        // Consecutive entries meet exactly.
        for pair in sub_ranges.windows(2) {
            assert_eq!(pair[0].start(), pair[1].end());
        }
    }

    #[test]
    fn exact_multiple_of_the_cap_leaves_no_stub_range() {
        let start = at(2021, 1, 1);
        let end = start + Duration::minutes(3 * MAX_BARS_PER_CALL);
        let range = TimeRange::new(start, end).unwrap();

        let sub_ranges = plan(&range, Interval::OneMinute, MAX_BARS_PER_CALL);

        assert_eq!(sub_ranges.len(), 3);
        for sub_range in &sub_ranges {
            assert_eq!(sub_range.duration_minutes(), MAX_BARS_PER_CALL);
        }
    }

    #[test]
    fn span_equal_to_the_cap_is_a_single_call() {
        let start = at(2021, 1, 1);
        let end = start + Duration::minutes(MAX_BARS_PER_CALL);
        let range = TimeRange::new(start, end).unwrap();

        assert_eq!(plan(&range, Interval::OneMinute, MAX_BARS_PER_CALL).len(), 1);
    }

    #[test]
    fn weekly_bars_use_the_derived_seven_day_duration() {
        // 30 weekly bars, cap 10: expect full chunks of 10 weeks each.
        let start = at(2020, 1, 6);
        let end = start + Duration::weeks(30);
        let range = TimeRange::new(start, end).unwrap();

        let sub_ranges = plan(&range, Interval::OneWeek, 10);

        assert_eq!(sub_ranges.len(), 3);
        for sub_range in &sub_ranges {
            assert_eq!(sub_range.duration_minutes(), 10 * 7 * 1_440);
        }
    }

    proptest! {
        #[test]
        fn partition_covers_the_range_exactly(
            start_secs in 1_262_304_000_i64..1_577_836_800,  // 2010..2020
            span_minutes in 1_i64..4_000_000,
            interval_index in 0_usize..Interval::ALL.len(),
        ) {
            let interval = Interval::ALL[interval_index];
            let start = Utc.timestamp_opt(start_secs, 0).single().unwrap();
            let end = start + Duration::minutes(span_minutes);
            let range = TimeRange::new(start, end).unwrap();

            let sub_ranges = plan(&range, interval, MAX_BARS_PER_CALL);

            // Coverage: newest end and oldest start match the query exactly,
            // and consecutive sub-ranges meet with no gap or overlap.
            prop_assert_eq!(sub_ranges[0].end(), range.end());
            prop_assert_eq!(sub_ranges[sub_ranges.len() - 1].start(), range.start());
            for pair in sub_ranges.windows(2) {
                prop_assert_eq!(pair[0].start(), pair[1].end());
            }

            // Cap: no sub-range implies more bars than one call may return.
            let bar_minutes = i64::from(interval.minutes());
            for sub_range in &sub_ranges {
                prop_assert!(sub_range.duration_minutes() <= MAX_BARS_PER_CALL * bar_minutes);
            }
        }
    }
}
