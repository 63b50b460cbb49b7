//! Time-of-day representation and the shared time-value evaluation
//! primitive every schedule evaluator reduces to.

use chrono::{NaiveTime, Timelike};

use super::error::ScheduleError;
use super::types::{Interpolation, TimeValue};

/// Minutes in a full day; also the end-of-day sentinel value.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// A time of day as a real-valued minute from midnight.
///
/// `24:00` is modeled as minute 1440. Every comparison against an
/// `Until:` boundary is strictly-less-than, so a value tagged
/// `Until: 24:00` covers the whole remainder of the day and never
/// collides with minute 0 of the next.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeOfDay {
    minutes: f64,
}

impl TimeOfDay {
    /// The end-of-day sentinel (`24:00`).
    pub fn end_of_day() -> Self {
        Self {
            minutes: MINUTES_PER_DAY,
        }
    }

    /// Builds a time of day from clock components.
    ///
    /// Returns `None` when a component is out of range (`hour > 23`,
    /// `minute > 59`, or `second > 59`).
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            minutes: f64::from(hour) * 60.0 + f64::from(minute) + f64::from(second) / 60.0,
        })
    }

    /// Builds a time of day from a whole minute count, capping at `24:00`.
    pub fn from_whole_minutes(minutes: u32) -> Self {
        Self {
            minutes: f64::from(minutes).min(MINUTES_PER_DAY),
        }
    }

    /// Converts a `chrono` time, including sub-second precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            minutes: f64::from(time.hour()) * 60.0
                + f64::from(time.minute())
                + f64::from(time.second()) / 60.0
                + f64::from(time.nanosecond()) / 60_000_000_000.0,
        }
    }

    /// Minutes from midnight.
    pub fn minutes(self) -> f64 {
        self.minutes
    }

    /// Parses a schedule time string.
    ///
    /// Accepted forms: `H[H]:MM`, `H[H]:MM:SS`, and bare `H[H]`. Any
    /// string starting with `24` means end of day, matching how existing
    /// model corpora spell the day boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::MalformedTime`] for anything else,
    /// including in-range-looking strings with out-of-range components.
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        let trimmed = input.trim();
        if trimmed.starts_with("24") {
            return Ok(Self::end_of_day());
        }

        let malformed = || ScheduleError::MalformedTime {
            input: input.to_string(),
        };

        let mut parts = trimmed.split(':');
        let hour = parse_component(parts.next(), 1, 2).ok_or_else(malformed)?;
        let (minute, second) = match parts.next() {
            None => (0, 0),
            Some(m) => {
                let minute = parse_component(Some(m), 2, 2).ok_or_else(malformed)?;
                match parts.next() {
                    None => (minute, 0),
                    Some(s) => {
                        let second = parse_component(Some(s), 2, 2).ok_or_else(malformed)?;
                        (minute, second)
                    }
                }
            }
        };
        if parts.next().is_some() {
            return Err(malformed());
        }

        Self::from_hms(hour, minute, second).ok_or_else(malformed)
    }
}

/// Parses a digit-only component of the given length bounds.
fn parse_component(part: Option<&str>, min_len: usize, max_len: usize) -> Option<u32> {
    let part = part?;
    if part.len() < min_len || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Evaluates a sorted time-value sequence at a query time.
///
/// Scans in order; the first entry whose `until` strictly exceeds the
/// query time determines the result. With a linear mode and a
/// non-degenerate interval, the result is interpolated between the
/// previous value (0.0 at the start of day) and the matched value by
/// fractional position. Past every entry, the last value holds. An empty
/// sequence evaluates to `0.0`.
pub fn evaluate_time_values(
    time_values: &[TimeValue],
    at: TimeOfDay,
    interpolation: Interpolation,
) -> f64 {
    let Some(last) = time_values.last() else {
        return 0.0;
    };

    let current = at.minutes();
    let mut prev_value = 0.0;
    let mut prev_minutes = 0.0;

    for tv in time_values {
        let until = tv.until.minutes();
        if current < until {
            if interpolation.is_linear() && until > prev_minutes {
                let fraction = (current - prev_minutes) / (until - prev_minutes);
                return prev_value + fraction * (tv.value - prev_value);
            }
            return tv.value;
        }
        prev_value = tv.value;
        prev_minutes = until;
    }

    last.value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tv(hour: u32, minute: u32, value: f64) -> TimeValue {
        TimeValue {
            until: TimeOfDay::from_hms(hour, minute, 0).expect("valid test time"),
            value,
        }
    }

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::from_hms(hour, minute, 0).expect("valid test time")
    }

    #[test]
    fn parses_common_forms() {
        assert_eq!(TimeOfDay::parse("08:00").ok(), TimeOfDay::from_hms(8, 0, 0));
        assert_eq!(TimeOfDay::parse("8:30").ok(), TimeOfDay::from_hms(8, 30, 0));
        assert_eq!(TimeOfDay::parse("23:59:59").ok(), TimeOfDay::from_hms(23, 59, 59));
        assert_eq!(TimeOfDay::parse("7").ok(), TimeOfDay::from_hms(7, 0, 0));
    }

    #[test]
    fn twenty_four_prefix_is_end_of_day() {
        assert_eq!(TimeOfDay::parse("24:00").ok(), Some(TimeOfDay::end_of_day()));
        assert_eq!(TimeOfDay::parse(" 24:00 ").ok(), Some(TimeOfDay::end_of_day()));
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        assert!(TimeOfDay::parse("noon").is_err());
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("12:3").is_err());
        assert!(TimeOfDay::parse("").is_err());
    }

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(evaluate_time_values(&[], at(12, 0), Interpolation::No), 0.0);
    }

    #[test]
    fn step_function_picks_first_exceeding_entry() {
        let tvs = [tv(8, 0, 0.0), tv(18, 0, 1.0), tv(23, 59, 0.0)];
        assert_eq!(evaluate_time_values(&tvs, at(7, 59), Interpolation::No), 0.0);
        assert_eq!(evaluate_time_values(&tvs, at(8, 0), Interpolation::No), 1.0);
        assert_eq!(evaluate_time_values(&tvs, at(17, 59), Interpolation::No), 1.0);
        assert_eq!(evaluate_time_values(&tvs, at(18, 0), Interpolation::No), 0.0);
    }

    #[test]
    fn past_all_entries_returns_last_value() {
        let tvs = [tv(8, 0, 0.25), tv(12, 0, 0.75)];
        assert_eq!(evaluate_time_values(&tvs, at(20, 0), Interpolation::No), 0.75);
    }

    #[test]
    fn linear_interpolation_midpoint() {
        let tvs = [
            tv(12, 0, 0.0),
            TimeValue {
                until: TimeOfDay::end_of_day(),
                value: 10.0,
            },
        ];
        assert_eq!(
            evaluate_time_values(&tvs, at(18, 0), Interpolation::No),
            10.0
        );
        assert_eq!(
            evaluate_time_values(&tvs, at(18, 0), Interpolation::Average),
            5.0
        );
    }

    #[test]
    fn interpolates_between_consecutive_samples() {
        let tvs = [tv(0, 0, 3.0), tv(12, 0, 7.0)];
        let mid = evaluate_time_values(&tvs, at(6, 0), Interpolation::Linear);
        assert!((mid - 5.0).abs() < 1e-12);
    }
}
