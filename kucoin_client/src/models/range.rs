use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid time range: start {start} is not before end {end}")]
pub struct RangeError {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A validated query window: `start` is always strictly before `end`.
///
/// The exchange treats both bounds inclusively, so two adjacent ranges that
/// meet at an instant may both return the bar at that instant; downstream
/// merging deduplicates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Builds a range, rejecting empty or inverted windows.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Constructor for ranges already known to satisfy `start < end`.
    pub(crate) const fn from_parts(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whole minutes between the bounds, truncating any sub-minute tail.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn rejects_inverted_and_empty_windows() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap();

        assert!(TimeRange::new(t1, t0).is_err());
        assert!(TimeRange::new(t0, t0).is_err());
        assert!(TimeRange::new(t0, t1).is_ok());
    }

    #[test]
    fn duration_is_reported_in_minutes() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 1, 2, 30, 0).unwrap();

        let range = TimeRange::new(t0, t1).unwrap();
        assert_eq!(range.duration_minutes(), 150);
    }
}
