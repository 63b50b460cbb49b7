//! Single-day schedule evaluation: constant, hourly, interval, and list
//! variants.

use chrono::{NaiveTime, Timelike};

use crate::object::IdfObject;

use super::clock::{self, TimeOfDay};
use super::error::ScheduleError;
use super::types::{Interpolation, TimeValue};

/// Maximum `Time i`/`Value Until Time i` pairs in an interval schedule
/// (one per 10 minutes).
const MAX_INTERVALS: usize = 144;

/// The four single-day schedule variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayScheduleKind {
    /// `Schedule:Constant` — one value for all times.
    Constant,
    /// `Schedule:Day:Hourly` — 24 values, one per hour.
    Hourly,
    /// `Schedule:Day:Interval` — explicit time-value pairs.
    Interval,
    /// `Schedule:Day:List` — values at a fixed cadence.
    List,
}

/// Evaluates a day schedule of the given kind at a time of day.
///
/// # Errors
///
/// Returns [`ScheduleError::MalformedTime`] or
/// [`ScheduleError::MalformedNumber`] when a field cannot be parsed.
/// Absent fields resolve to `0.0`.
pub fn evaluate_day(
    obj: &IdfObject,
    kind: DayScheduleKind,
    at: NaiveTime,
    interpolation: Interpolation,
) -> Result<f64, ScheduleError> {
    match kind {
        DayScheduleKind::Constant => evaluate_constant(obj),
        DayScheduleKind::Hourly => evaluate_hourly(obj, at),
        DayScheduleKind::Interval => evaluate_interval(obj, at, interpolation),
        DayScheduleKind::List => evaluate_list(obj, at, interpolation),
    }
}

/// Evaluates a `Schedule:Constant`: the `Hourly Value` field, or `0.0`
/// when absent.
pub fn evaluate_constant(obj: &IdfObject) -> Result<f64, ScheduleError> {
    match obj.get("Hourly Value") {
        Some(value) => parse_number("Hourly Value", value),
        None => Ok(0.0),
    }
}

/// Evaluates a `Schedule:Day:Hourly`: the `Hour 1`..`Hour 24` field for
/// the query's hour, or `0.0` when absent.
pub fn evaluate_hourly(obj: &IdfObject, at: NaiveTime) -> Result<f64, ScheduleError> {
    let field = format!("Hour {}", at.hour() + 1);
    match obj.get(&field) {
        Some(value) => parse_number(&field, value),
        None => Ok(0.0),
    }
}

/// Evaluates a `Schedule:Day:Interval` via the shared time-value scan.
pub fn evaluate_interval(
    obj: &IdfObject,
    at: NaiveTime,
    interpolation: Interpolation,
) -> Result<f64, ScheduleError> {
    let time_values = parse_interval_time_values(obj)?;
    Ok(clock::evaluate_time_values(
        &time_values,
        TimeOfDay::from_naive(at),
        interpolation,
    ))
}

/// Evaluates a `Schedule:Day:List`: values at a fixed cadence filling the
/// day.
///
/// The cadence comes from `Minutes per Item` (default 60); the last
/// partial bucket is capped at end of day. An inline
/// `Interpolate to Timestep` field of `yes`, `average`, or `linear`
/// overrides the caller-supplied interpolation mode.
pub fn evaluate_list(
    obj: &IdfObject,
    at: NaiveTime,
    interpolation: Interpolation,
) -> Result<f64, ScheduleError> {
    let minutes_per_item = match obj.get("Minutes per Item") {
        Some(value) => value.trim().parse::<u32>().map_err(|_| {
            ScheduleError::MalformedNumber {
                field: "Minutes per Item".to_string(),
                input: value.to_string(),
            }
        })?,
        None => 60,
    };

    let mut interpolation = interpolation;
    if let Some(flag) = obj.get("Interpolate to Timestep") {
        let flag = flag.trim().to_ascii_lowercase();
        if matches!(flag.as_str(), "average" | "linear" | "yes") {
            interpolation = Interpolation::Average;
        }
    }

    let mut time_values = Vec::new();
    let mut current_minutes = 0u32;
    for i in 1.. {
        let field = format!("Value {i}");
        let Some(value) = obj.get(&field) else {
            break;
        };
        current_minutes = current_minutes.saturating_add(minutes_per_item);
        time_values.push(TimeValue {
            until: TimeOfDay::from_whole_minutes(current_minutes),
            value: parse_number(&field, value)?,
        });
        if current_minutes >= clock::MINUTES_PER_DAY as u32 {
            break;
        }
    }

    Ok(clock::evaluate_time_values(
        &time_values,
        TimeOfDay::from_naive(at),
        interpolation,
    ))
}

/// Materializes a full day as `24 * timestep` samples by evaluating at
/// every sub-hour instant, e.g. for export or plotting.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTimestep`] unless `timestep` divides
/// 60 evenly, plus any field parse error from the underlying evaluator.
pub fn day_values(
    obj: &IdfObject,
    kind: DayScheduleKind,
    timestep: u32,
    interpolation: Interpolation,
) -> Result<Vec<f64>, ScheduleError> {
    if timestep == 0 || 60 % timestep != 0 {
        return Err(ScheduleError::InvalidTimestep { timestep });
    }
    let minutes_per_step = 60 / timestep;

    let mut values = Vec::with_capacity(24 * timestep as usize);
    for hour in 0..24 {
        for step in 0..timestep {
            let at = NaiveTime::from_hms_opt(hour, step * minutes_per_step, 0)
                .ok_or(ScheduleError::InvalidTimestep { timestep })?;
            values.push(evaluate_day(obj, kind, at, interpolation)?);
        }
    }
    Ok(values)
}

/// Parses the `Time i` / `Value Until Time i` pairs of an interval
/// schedule, stopping at the first absent pair member.
fn parse_interval_time_values(obj: &IdfObject) -> Result<Vec<TimeValue>, ScheduleError> {
    let mut time_values = Vec::new();
    for i in 1..=MAX_INTERVALS {
        let Some(time_str) = obj.get(&format!("Time {i}")) else {
            break;
        };
        let value_field = format!("Value Until Time {i}");
        let Some(value) = obj.get(&value_field) else {
            break;
        };
        time_values.push(TimeValue {
            until: TimeOfDay::parse(time_str)?,
            value: parse_number(&value_field, value)?,
        });
    }
    Ok(time_values)
}

/// Parses a numeric field, mapping failure to the malformed-number error.
pub(super) fn parse_number(field: &str, value: &str) -> Result<f64, ScheduleError> {
    value
        .trim()
        .parse()
        .map_err(|_| ScheduleError::MalformedNumber {
            field: field.to_string(),
            input: value.to_string(),
        })
}
