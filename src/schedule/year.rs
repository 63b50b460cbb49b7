//! `Schedule:Year` evaluation: date ranges referencing week schedules.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::document::Document;
use crate::object::IdfObject;

use super::error::ScheduleError;
use super::types::EvalOptions;
use super::week;

/// Candidate object types for a referenced week schedule, tried in order.
const WEEK_SCHEDULE_TYPES: [&str; 2] = ["Schedule:Week:Daily", "Schedule:Week:Compact"];

/// Evaluates a `Schedule:Year` at a datetime.
///
/// Scans the repeating `Schedule:Week Name i` / `Start Month i` /
/// `Start Day i` / `End Month i` / `End Day i` groups until the week-name
/// field is absent; groups with any other member missing are skipped.
/// Ranges are inclusive, and a range whose end precedes its start wraps
/// the year boundary (`Nov 1`–`Feb 28` matches both December and
/// January). The first matching group wins.
///
/// # Errors
///
/// Unlike day and compact evaluation, failures here are structural model
/// defects and are raised: an uncovered query date
/// ([`ScheduleError::NoMatchingDateRange`]), a dangling week-schedule
/// name ([`ScheduleError::UnresolvedReference`]), or unparseable
/// month/day fields.
pub fn evaluate_year(
    obj: &IdfObject,
    doc: &Document,
    at: NaiveDateTime,
    options: &EvalOptions,
) -> Result<f64, ScheduleError> {
    let date = at.date();
    let year = date.year();

    let mut i = 1;
    loop {
        let Some(week_name) = obj.get(&format!("Schedule:Week Name {i}")) else {
            break;
        };

        let group = (
            obj.get(&format!("Start Month {i}")),
            obj.get(&format!("Start Day {i}")),
            obj.get(&format!("End Month {i}")),
            obj.get(&format!("End Day {i}")),
        );
        let (Some(start_month), Some(start_day), Some(end_month), Some(end_day)) = group else {
            log::debug!("week group {i} is missing date fields; skipping");
            i += 1;
            continue;
        };

        let start = resolve_date(year, start_month, start_day, i, "Start")?;
        let end = resolve_date(year, end_month, end_day, i, "End")?;

        let matches = if end < start {
            // Range wraps the year boundary.
            date >= start || date <= end
        } else {
            date >= start && date <= end
        };

        if matches {
            let week_name = week_name.trim();
            let week = doc
                .find_any(&WEEK_SCHEDULE_TYPES, week_name)
                .ok_or_else(|| ScheduleError::UnresolvedReference {
                    name: week_name.to_string(),
                })?;
            return if week.is_type("Schedule:Week:Daily") {
                week::evaluate_week_daily(week, doc, at, options)
            } else {
                week::evaluate_week_compact(week, doc, at, options)
            };
        }

        i += 1;
    }

    Err(ScheduleError::NoMatchingDateRange { date })
}

/// Builds a concrete date in the query year from month and day fields.
fn resolve_date(
    year: i32,
    month_str: &str,
    day_str: &str,
    group: usize,
    bound: &str,
) -> Result<NaiveDate, ScheduleError> {
    let month = parse_month(month_str).ok_or_else(|| ScheduleError::MalformedNumber {
        field: format!("{bound} Month {group}"),
        input: month_str.to_string(),
    })?;
    let day: u32 = day_str
        .trim()
        .parse()
        .map_err(|_| ScheduleError::MalformedNumber {
            field: format!("{bound} Day {group}"),
            input: day_str.to_string(),
        })?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScheduleError::InvalidDate {
        year,
        month,
        day,
    })
}

/// Parses a month field: a 1-12 numeral or a case-insensitive English
/// month name.
fn parse_month(value: &str) -> Option<u32> {
    let value = value.trim().to_ascii_lowercase();
    let month = match value.as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return value.parse().ok(),
    };
    Some(month)
}
