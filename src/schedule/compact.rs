//! `Schedule:Compact` parsing and evaluation.
//!
//! The compact format encodes a full year as nested blocks:
//!
//! ```text
//! Through: 12/31,      ! period end date
//! For: Weekdays,       ! day types the next rules apply to
//! Until: 08:00, 0.0,   ! value holds until this time
//! Until: 18:00, 1.0,
//! Until: 24:00, 0.0,
//! For: AllOtherDays,
//! Until: 24:00, 0.0
//! ```
//!
//! Parsing is a single pass over the numbered extensible fields; any field
//! matching no keyword is ignored so that stray values in hand-edited
//! models cannot derail evaluation.

use chrono::{NaiveDate, NaiveDateTime};

use crate::object::IdfObject;

use super::clock::{self, TimeOfDay};
use super::day::parse_number;
use super::error::ScheduleError;
use super::types::{
    CompactDayRule, CompactPeriod, DayTypeLabel, DayTypeSet, EvalOptions, Interpolation,
    PRIORITY_ORDER, TimeValue, applicable_day_types, parse_day_type_tokens,
};

/// Hard cap on scanned extensible fields.
const MAX_FIELDS: usize = 500;

/// Scanning stops after this many consecutive absent fields, tolerating
/// sparse or padded field lists.
const MAX_CONSECUTIVE_EMPTY: usize = 3;

/// The structured form of a parsed `Schedule:Compact`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactSchedule {
    /// `Through:` periods in declaration order.
    pub periods: Vec<CompactPeriod>,
    /// Interpolation mode from any `Interpolate:` field (one mode for the
    /// whole schedule).
    pub interpolation: Interpolation,
}

/// Parses a `Schedule:Compact` object's fields into periods and rules.
///
/// # Errors
///
/// Returns [`ScheduleError::MalformedTime`] for an `Until:` with
/// out-of-range components and [`ScheduleError::MalformedNumber`] for an
/// unparseable value field. Unrecognized fields and day-type tokens are
/// skipped, not errors.
pub fn parse_compact(obj: &IdfObject) -> Result<CompactSchedule, ScheduleError> {
    let mut periods: Vec<CompactPeriod> = Vec::new();
    let mut interpolation = Interpolation::No;
    let mut current_period: Option<CompactPeriod> = None;
    let mut current_rule: Option<CompactDayRule> = None;

    let mut index = 0;
    let mut consecutive_empty = 0;
    while index < MAX_FIELDS {
        let Some(raw) = extensible_field(obj, index) else {
            consecutive_empty += 1;
            if consecutive_empty >= MAX_CONSECUTIVE_EMPTY {
                break;
            }
            index += 1;
            continue;
        };
        consecutive_empty = 0;

        let value = raw.trim();
        if value.is_empty() {
            index += 1;
            continue;
        }

        if let Some((month, day)) = parse_through(value) {
            if let Some(mut period) = current_period.take() {
                if let Some(rule) = current_rule.take() {
                    period.day_rules.push(rule);
                }
                periods.push(period);
            }
            current_rule = None;
            current_period = Some(CompactPeriod {
                end_month: month,
                end_day: day,
                day_rules: Vec::new(),
            });
        } else if let Some(day_types) = parse_for(value) {
            if let Some(rule) = current_rule.take() {
                if let Some(period) = current_period.as_mut() {
                    period.day_rules.push(rule);
                }
            }
            current_rule = Some(CompactDayRule {
                day_types,
                time_values: Vec::new(),
            });
        } else if let Some(until) = parse_until(value) {
            let until = until?;
            // The value rides in the immediately following field.
            index += 1;
            if let Some(value_raw) = extensible_field(obj, index) {
                if let Some(rule) = current_rule.as_mut() {
                    let field = format!("Field {}", index + 1);
                    rule.time_values.push(TimeValue {
                        until,
                        value: parse_number(&field, value_raw)?,
                    });
                }
            }
        } else if let Some(linear) = parse_interpolate(value) {
            if linear {
                interpolation = Interpolation::Average;
            }
        }
        // Anything else is a stray field; skip it.

        index += 1;
    }

    if let Some(mut period) = current_period {
        if let Some(rule) = current_rule {
            period.day_rules.push(rule);
        }
        periods.push(period);
    }

    Ok(CompactSchedule {
        periods,
        interpolation,
    })
}

/// Parses and evaluates a `Schedule:Compact` at a datetime.
///
/// Missing periods or rules resolve to `0.0`; only malformed fields are
/// errors. See [`evaluate_parsed`] for the evaluation rules.
pub fn evaluate_compact(
    obj: &IdfObject,
    at: NaiveDateTime,
    options: &EvalOptions,
) -> Result<f64, ScheduleError> {
    let parsed = parse_compact(obj)?;
    Ok(evaluate_parsed(&parsed, at, options))
}

/// Evaluates an already-parsed compact schedule at a datetime.
///
/// Selects the period covering the query date (falling back to the last
/// period past year end), then the highest-priority day rule the date
/// satisfies, then runs the shared time-value scan with the schedule's
/// interpolation mode.
pub fn evaluate_parsed(schedule: &CompactSchedule, at: NaiveDateTime, options: &EvalOptions) -> f64 {
    let date = at.date();
    let Some(period) = find_period(&schedule.periods, date) else {
        return 0.0;
    };
    let applicable = applicable_day_types(date, options);
    let Some(rule) = find_matching_rule(&period.day_rules, applicable) else {
        return 0.0;
    };
    clock::evaluate_time_values(
        &rule.time_values,
        TimeOfDay::from_naive(at.time()),
        schedule.interpolation,
    )
}

/// Finds the first period whose end date is on or after `date`.
///
/// Periods past their declared order are tolerated: a date beyond every
/// period's end lands in the last period, which also absorbs the
/// year-wraparound case.
fn find_period(periods: &[CompactPeriod], date: NaiveDate) -> Option<&CompactPeriod> {
    periods
        .iter()
        .find(|p| p.contains(date))
        .or_else(|| periods.last())
}

/// Selects the rule for a set of applicable day types.
///
/// Walks [`PRIORITY_ORDER`] (most specific label first); at the first
/// label present in `applicable`, the first declared rule naming that
/// label wins. A rule tagged `AllOtherDays` is the final fallback.
pub(super) fn find_matching_rule(
    rules: &[CompactDayRule],
    applicable: DayTypeSet,
) -> Option<&CompactDayRule> {
    for label in PRIORITY_ORDER {
        if !applicable.contains(label) {
            continue;
        }
        if let Some(rule) = rules.iter().find(|r| r.day_types.contains(label)) {
            return Some(rule);
        }
    }
    rules
        .iter()
        .find(|r| r.day_types.contains(DayTypeLabel::AllOtherDays))
}

/// Reads extensible field `index` (0-based; fields are named `Field 1`,
/// `Field 2`, ...).
fn extensible_field(obj: &IdfObject, index: usize) -> Option<&str> {
    obj.get(&format!("Field {}", index + 1))
}

/// Case-insensitive prefix strip.
fn strip_keyword<'a>(value: &'a str, keyword: &str) -> Option<&'a str> {
    match value.split_at_checked(keyword.len()) {
        Some((head, rest)) if head.eq_ignore_ascii_case(keyword) => Some(rest),
        _ => None,
    }
}

/// A digit-only component between `min_len` and `max_len` characters.
fn digits(part: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if part.len() < min_len || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// `Through: M/D` (or `M-D`). Anything not matching the shape is treated
/// as a stray field.
fn parse_through(value: &str) -> Option<(u32, u32)> {
    let rest = strip_keyword(value, "through:")?.trim();
    let (month, day) = rest.split_once(['/', '-'])?;
    Some((digits(month, 1, 2)?, digits(day, 1, 2)?))
}

/// `For: <day-type list>`. Unrecognized tokens are dropped from the set
/// (logged for diagnosis), preserving compatibility with existing files.
fn parse_for(value: &str) -> Option<DayTypeSet> {
    let rest = strip_keyword(value, "for:")?.trim();
    if rest.is_empty() {
        return None;
    }
    Some(parse_day_type_tokens(rest))
}

/// `Until: HH:MM[:SS]`. Hour 24 means end of day; a matching shape with
/// out-of-range components is a malformed-time error, while a
/// non-matching shape is a stray field.
fn parse_until(value: &str) -> Option<Result<TimeOfDay, ScheduleError>> {
    let rest = strip_keyword(value, "until:")?.trim();
    let mut parts = rest.split(':');
    let hour = digits(parts.next()?, 1, 2)?;
    let minute = digits(parts.next()?, 2, 2)?;
    let second = match parts.next() {
        Some(s) => digits(s, 2, 2)?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    if hour == 24 {
        return Some(Ok(TimeOfDay::end_of_day()));
    }
    Some(
        TimeOfDay::from_hms(hour, minute, second).ok_or_else(|| ScheduleError::MalformedTime {
            input: value.to_string(),
        }),
    )
}

/// `Interpolate: yes|no|average|linear`; returns whether linear
/// interpolation was requested.
fn parse_interpolate(value: &str) -> Option<bool> {
    let rest = strip_keyword(value, "interpolate:")?.trim().to_ascii_lowercase();
    match rest.as_str() {
        "yes" | "average" | "linear" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
