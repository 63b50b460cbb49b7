//! Special-day extraction: expanding `RunPeriodControl:SpecialDays`
//! objects into the concrete date sets day-type classification consumes.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::document::Document;

use super::types::{DayTypeLabel, EvalOptions, SpecialDay};

/// Object type carrying holiday and custom-day declarations.
const SPECIAL_DAYS_TYPE: &str = "RunPeriodControl:SpecialDays";

/// Extracts every special-day period declared in the document, anchored
/// to the given year.
///
/// Start dates are accepted as `M/D`, `Month D`, or `D Month` (full
/// English month names). Relative forms like "2nd Monday in May" are not
/// resolved; such objects are skipped with a logged warning so stricter
/// tooling can surface them.
pub fn extract_special_days(doc: &Document, year: i32) -> Vec<SpecialDay> {
    let mut days = Vec::new();
    for obj in doc.objects_of_type(SPECIAL_DAYS_TYPE) {
        let Some(start_raw) = obj.get("Start Date") else {
            log::warn!("special day {:?} has no start date; skipping", obj.name);
            continue;
        };
        let Some(start_date) = parse_start_date(start_raw, year) else {
            log::warn!(
                "special day {:?} has unsupported start date {start_raw:?}; skipping",
                obj.name
            );
            continue;
        };

        let duration_days = match obj.get("Duration") {
            None => 1,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(d) => d.max(1),
                Err(_) => {
                    log::warn!(
                        "special day {:?} has unparseable duration {raw:?}; skipping",
                        obj.name
                    );
                    continue;
                }
            },
        };

        let day_type = match obj.get("Special Day Type").map(str::trim) {
            None | Some("") => DayTypeLabel::Holiday,
            Some(token) => match DayTypeLabel::from_token(token) {
                Some(
                    label @ (DayTypeLabel::Holiday
                    | DayTypeLabel::CustomDay1
                    | DayTypeLabel::CustomDay2),
                ) => label,
                _ => {
                    log::warn!(
                        "special day {:?} has unsupported type {token:?}; treating as holiday",
                        obj.name
                    );
                    DayTypeLabel::Holiday
                }
            },
        };

        days.push(SpecialDay {
            name: obj.name.clone(),
            start_date,
            duration_days,
            day_type,
        });
    }
    days
}

/// All dates of the given special-day class in the given year.
pub fn special_day_dates(doc: &Document, year: i32, label: DayTypeLabel) -> HashSet<NaiveDate> {
    let mut dates = HashSet::new();
    for special in extract_special_days(doc, year) {
        if special.day_type != label {
            continue;
        }
        for offset in 0..special.duration_days {
            if let Some(date) = special
                .start_date
                .checked_add_days(Days::new(u64::from(offset)))
            {
                dates.insert(date);
            }
        }
    }
    dates
}

/// All holiday dates in the given year.
pub fn holiday_dates(doc: &Document, year: i32) -> HashSet<NaiveDate> {
    special_day_dates(doc, year, DayTypeLabel::Holiday)
}

/// Evaluation options pre-filled with the document's holiday and
/// custom-day date sets for a year.
pub fn special_day_options(doc: &Document, year: i32) -> EvalOptions {
    EvalOptions {
        holidays: special_day_dates(doc, year, DayTypeLabel::Holiday),
        custom_day_1: special_day_dates(doc, year, DayTypeLabel::CustomDay1),
        custom_day_2: special_day_dates(doc, year, DayTypeLabel::CustomDay2),
        ..EvalOptions::default()
    }
}

/// Parses a special-day start date against a concrete year.
fn parse_start_date(value: &str, year: i32) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some((month, day)) = value.split_once('/') {
        let month = month.trim().parse().ok()?;
        let day = day.trim().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let parts: Vec<&str> = value.split_whitespace().collect();
    if let [a, b] = parts[..] {
        // Either "January 2" or "2 January"
        if let Some(month) = month_number(a) {
            return NaiveDate::from_ymd_opt(year, month, b.parse().ok()?);
        }
        if let Some(month) = month_number(b) {
            return NaiveDate::from_ymd_opt(year, month, a.parse().ok()?);
        }
    }
    None
}

/// Full English month name to month number, ignoring case.
fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
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
        _ => return None,
    };
    Some(month)
}
