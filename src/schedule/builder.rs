//! Schedule construction: compressing hourly arrays into compact fields.
//!
//! The inverse of the evaluators in the sibling modules. Consecutive days
//! sharing a 24-hour profile merge into one `Through:` block; consecutive
//! hours sharing a value merge into one `Until:` pair. Re-parsing and
//! re-evaluating the emitted fields reproduces the input array within the
//! grouping tolerance.

use chrono::{Datelike, Days, NaiveDate};

use crate::document::Document;
use crate::object::IdfObject;

use super::error::ScheduleError;

/// Default absolute tolerance for day-profile grouping.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Hours in a non-leap year.
const HOURS_NON_LEAP: usize = 8760;

/// Hours in a leap year.
const HOURS_LEAP: usize = 8784;

/// True when `year` is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Compresses hourly values into `Schedule:Compact` field strings.
///
/// `values` must hold exactly 8760 entries (8784 for a leap `year`), one
/// per hour starting January 1, 00:00. Consecutive days whose profiles
/// match within `tolerance` become a single `Through:` block covering
/// `AllDays`; within each block, consecutive equal hours become one
/// `Until:`/value pair, the last always closing at `24:00`.
///
/// # Errors
///
/// Returns [`ScheduleError::LengthMismatch`] when the array length does
/// not match the year before any other work happens.
///
/// # Examples
///
/// ```
/// use epsched::schedule::builder::{DEFAULT_TOLERANCE, compact_fields_from_values};
///
/// let fields = compact_fields_from_values(&[0.75; 8760], 2023, DEFAULT_TOLERANCE)
///     .expect("8760 values match a non-leap year");
/// assert_eq!(fields, ["Through: 12/31", "For: AllDays", "Until: 24:00", "0.75"]);
/// ```
pub fn compact_fields_from_values(
    values: &[f64],
    year: i32,
    tolerance: f64,
) -> Result<Vec<String>, ScheduleError> {
    let expected = if is_leap_year(year) {
        HOURS_LEAP
    } else {
        HOURS_NON_LEAP
    };
    if values.len() != expected {
        return Err(ScheduleError::LengthMismatch {
            year,
            expected,
            actual: values.len(),
        });
    }

    let profiles: Vec<&[f64]> = values.chunks_exact(24).collect();

    // Greedily merge consecutive days into maximal runs sharing a profile.
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut run_start = 0;
    for day in 1..profiles.len() {
        if !profiles_equal(profiles[day], profiles[run_start], tolerance) {
            runs.push((run_start, day - 1));
            run_start = day;
        }
    }
    runs.push((run_start, profiles.len() - 1));

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ScheduleError::InvalidDate {
        year,
        month: 1,
        day: 1,
    })?;

    let mut fields = Vec::new();
    for (start, end) in runs {
        let end_date =
            jan1.checked_add_days(Days::new(end as u64))
                .ok_or(ScheduleError::InvalidDate {
                    year,
                    month: 12,
                    day: 31,
                })?;
        fields.push(format!("Through: {}/{}", end_date.month(), end_date.day()));
        fields.push("For: AllDays".to_string());
        push_until_fields(profiles[start], &mut fields);
    }
    Ok(fields)
}

/// Builds a `Schedule:Compact` object from hourly values and adds it to
/// the document.
///
/// Pass an empty `type_limits` to omit the limits reference.
pub fn create_compact_schedule<'a>(
    doc: &'a mut Document,
    name: &str,
    values: &[f64],
    year: i32,
    type_limits: &str,
    tolerance: f64,
) -> Result<&'a IdfObject, ScheduleError> {
    let fields = compact_fields_from_values(values, year, tolerance)?;
    let mut obj = IdfObject::new("Schedule:Compact", name);
    if !type_limits.is_empty() {
        obj.set("Schedule Type Limits Name", type_limits);
    }
    for (i, field) in fields.into_iter().enumerate() {
        obj.set(format!("Field {}", i + 1), field);
    }
    Ok(doc.add(obj))
}

/// Builds a `Schedule:Constant` object and adds it to the document.
pub fn create_constant_schedule<'a>(
    doc: &'a mut Document,
    name: &str,
    value: f64,
    type_limits: &str,
) -> &'a IdfObject {
    let mut obj = IdfObject::new("Schedule:Constant", name);
    if !type_limits.is_empty() {
        obj.set("Schedule Type Limits Name", type_limits);
    }
    obj.set("Hourly Value", format_value(value));
    doc.add(obj)
}

/// Builds a `ScheduleTypeLimits` object and adds it to the document.
///
/// Pass an empty `unit_type` to omit that field.
pub fn create_schedule_type_limits<'a>(
    doc: &'a mut Document,
    name: &str,
    lower: f64,
    upper: f64,
    numeric_type: &str,
    unit_type: &str,
) -> &'a IdfObject {
    let mut obj = IdfObject::new("ScheduleTypeLimits", name);
    obj.set("Lower Limit Value", format_value(lower));
    obj.set("Upper Limit Value", format_value(upper));
    obj.set("Numeric Type", numeric_type);
    if !unit_type.is_empty() {
        obj.set("Unit Type", unit_type);
    }
    doc.add(obj)
}

/// Compares two 24-hour profiles within an absolute tolerance.
fn profiles_equal(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= tolerance)
}

/// Appends `Until:`/value field pairs for one 24-hour profile, merging
/// consecutive equal hours.
///
/// Intra-day merging uses exact equality, not the grouping tolerance: all
/// 24 values come from the same input run, so a value is only ever
/// compared against itself.
fn push_until_fields(profile: &[f64], fields: &mut Vec<String>) {
    let mut prev_value = profile[0];
    let mut run_end_hour = 1;
    for (hour, &value) in profile.iter().enumerate().skip(1) {
        if value != prev_value {
            fields.push(format!("Until: {run_end_hour:02}:00"));
            fields.push(format_value(prev_value));
            prev_value = value;
        }
        run_end_hour = hour + 1;
    }
    fields.push(format!("Until: {run_end_hour:02}:00"));
    fields.push(format_value(prev_value));
}

/// Formats a value for a compact field: up to 15 significant digits,
/// trailing zeros trimmed, integral values without a decimal point.
pub(crate) fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    // Round to 15 significant digits, then let the shortest-representation
    // formatter drop the trailing zeros.
    let rounded: f64 = format!("{value:.14e}").parse().unwrap_or(value);
    rounded.to_string()
}
