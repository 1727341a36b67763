//! Bar granularities accepted by the kline endpoint.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized interval token: {0}")]
pub struct IntervalError(String);

const MINUTES_PER_DAY: u32 = 1_440;

/// The fixed set of bar intervals the exchange serves.
///
/// Each variant maps to exactly one wire token (e.g. `1min`, `4hour`) and one
/// duration in minutes. Tokens outside this set are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneMinute,
    ThreeMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    SixHours,
    EightHours,
    TwelveHours,
    OneDay,
    OneWeek,
}

impl Interval {
    /// Every interval the exchange serves, shortest first.
    pub const ALL: [Interval; 13] = [
        Interval::OneMinute,
        Interval::ThreeMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::TwoHours,
        Interval::FourHours,
        Interval::SixHours,
        Interval::EightHours,
        Interval::TwelveHours,
        Interval::OneDay,
        Interval::OneWeek,
    ];

    /// Duration of one bar in minutes.
    ///
    /// A week has no native minute duration on the exchange side; it is
    /// derived as seven one-day bars.
    pub const fn minutes(self) -> u32 {
        match self {
            Interval::OneMinute => 1,
            Interval::ThreeMinutes => 3,
            Interval::FiveMinutes => 5,
            Interval::FifteenMinutes => 15,
            Interval::ThirtyMinutes => 30,
            Interval::OneHour => 60,
            Interval::TwoHours => 120,
            Interval::FourHours => 240,
            Interval::SixHours => 360,
            Interval::EightHours => 480,
            Interval::TwelveHours => 720,
            Interval::OneDay => MINUTES_PER_DAY,
            Interval::OneWeek => 7 * MINUTES_PER_DAY,
        }
    }

    /// The token the exchange expects in the `type` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::ThreeMinutes => "3min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::OneHour => "1hour",
            Interval::TwoHours => "2hour",
            Interval::FourHours => "4hour",
            Interval::SixHours => "6hour",
            Interval::EightHours => "8hour",
            Interval::TwelveHours => "12hour",
            Interval::OneDay => "1day",
            Interval::OneWeek => "1week",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1min" => Ok(Interval::OneMinute),
            "3min" => Ok(Interval::ThreeMinutes),
            "5min" => Ok(Interval::FiveMinutes),
            "15min" => Ok(Interval::FifteenMinutes),
            "30min" => Ok(Interval::ThirtyMinutes),
            "1hour" => Ok(Interval::OneHour),
            "2hour" => Ok(Interval::TwoHours),
            "4hour" => Ok(Interval::FourHours),
            "6hour" => Ok(Interval::SixHours),
            "8hour" => Ok(Interval::EightHours),
            "12hour" => Ok(Interval::TwelveHours),
            "1day" => Ok(Interval::OneDay),
            "1week" => Ok(Interval::OneWeek),
            _ => Err(IntervalError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips() {
        for interval in Interval::ALL {
            let parsed: Interval = interval.as_str().parse().unwrap();
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        for token in ["2min", "1h", "45min", "1month", ""] {
            let err = token.parse::<Interval>().unwrap_err();
            assert!(err.to_string().contains(token));
        }
    }

    #[test]
    fn week_duration_is_seven_days() {
        assert_eq!(Interval::OneWeek.minutes(), 7 * Interval::OneDay.minutes());
    }

    #[test]
    fn durations_are_strictly_increasing() {
        for pair in Interval::ALL.windows(2) {
            assert!(pair[0].minutes() < pair[1].minutes());
        }
    }
}
