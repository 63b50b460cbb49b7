//! Week-schedule evaluation: selecting a day schedule per day type.
//!
//! `Schedule:Week:Daily` names one day schedule per concrete day type;
//! `Schedule:Week:Compact` pairs day-type lists with day-schedule names.
//! Both reduce to resolving a named `Schedule:Day:*` object in the owning
//! document and delegating to the day evaluator.

use chrono::NaiveDateTime;

use crate::document::Document;
use crate::object::IdfObject;

use super::day::{self, DayScheduleKind};
use super::error::ScheduleError;
use super::types::{
    DayTypeLabel, DayTypeSet, EvalOptions, Interpolation, PRIORITY_ORDER, applicable_day_types,
    parse_day_type_tokens,
};

/// Candidate object types for a referenced day schedule, tried in order.
const DAY_SCHEDULE_TYPES: [(&str, DayScheduleKind); 3] = [
    ("Schedule:Day:Hourly", DayScheduleKind::Hourly),
    ("Schedule:Day:Interval", DayScheduleKind::Interval),
    ("Schedule:Day:List", DayScheduleKind::List),
];

/// Evaluates a `Schedule:Week:Daily` at a datetime.
///
/// Walks the day-type priority order and, at the first applicable label
/// whose `<DayType> Schedule:Day Name` field is filled, resolves and
/// evaluates that day schedule. A week with no applicable entry yields
/// `0.0`.
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvedReference`] when a named day
/// schedule does not exist in the document.
pub fn evaluate_week_daily(
    obj: &IdfObject,
    doc: &Document,
    at: NaiveDateTime,
    options: &EvalOptions,
) -> Result<f64, ScheduleError> {
    let applicable = applicable_day_types(at.date(), options);
    for label in PRIORITY_ORDER {
        if !applicable.contains(label) {
            continue;
        }
        let Some(field) = daily_field_name(label) else {
            continue;
        };
        let Some(name) = obj.get(field).map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        return evaluate_named_day(doc, name, at, options.interpolation);
    }
    Ok(0.0)
}

/// Evaluates a `Schedule:Week:Compact` at a datetime.
///
/// Scans the extensible `DayType List i` / `Schedule:Day Name i` pairs
/// (an optional leading `For:` in the list is accepted), then applies the
/// same priority-ordered selection as compact day rules, including the
/// `AllOtherDays` fallback.
pub fn evaluate_week_compact(
    obj: &IdfObject,
    doc: &Document,
    at: NaiveDateTime,
    options: &EvalOptions,
) -> Result<f64, ScheduleError> {
    let mut entries: Vec<(DayTypeSet, &str)> = Vec::new();
    for i in 1.. {
        let Some(list) = obj.get(&format!("DayType List {i}")) else {
            break;
        };
        let Some(name) = obj.get(&format!("Schedule:Day Name {i}")).map(str::trim) else {
            log::debug!("day-type list {i} has no paired schedule name; skipping");
            break;
        };
        let list = list.trim();
        let list = strip_for_prefix(list);
        entries.push((parse_day_type_tokens(list), name));
    }

    let applicable = applicable_day_types(at.date(), options);
    for label in PRIORITY_ORDER {
        if !applicable.contains(label) {
            continue;
        }
        for (day_types, name) in &entries {
            if day_types.contains(label) {
                return evaluate_named_day(doc, name, at, options.interpolation);
            }
        }
    }
    for (day_types, name) in &entries {
        if day_types.contains(DayTypeLabel::AllOtherDays) {
            return evaluate_named_day(doc, name, at, options.interpolation);
        }
    }
    Ok(0.0)
}

/// Resolves a day schedule by name and evaluates it.
fn evaluate_named_day(
    doc: &Document,
    name: &str,
    at: NaiveDateTime,
    interpolation: Interpolation,
) -> Result<f64, ScheduleError> {
    for (obj_type, kind) in DAY_SCHEDULE_TYPES {
        if let Some(day) = doc.find(obj_type, name) {
            return day::evaluate_day(day, kind, at.time(), interpolation);
        }
    }
    Err(ScheduleError::UnresolvedReference {
        name: name.to_string(),
    })
}

/// The `Schedule:Week:Daily` field naming a label's day schedule, if the
/// label has one (the grouping labels do not).
fn daily_field_name(label: DayTypeLabel) -> Option<&'static str> {
    let field = match label {
        DayTypeLabel::Sunday => "Sunday Schedule:Day Name",
        DayTypeLabel::Monday => "Monday Schedule:Day Name",
        DayTypeLabel::Tuesday => "Tuesday Schedule:Day Name",
        DayTypeLabel::Wednesday => "Wednesday Schedule:Day Name",
        DayTypeLabel::Thursday => "Thursday Schedule:Day Name",
        DayTypeLabel::Friday => "Friday Schedule:Day Name",
        DayTypeLabel::Saturday => "Saturday Schedule:Day Name",
        DayTypeLabel::Holiday => "Holiday Schedule:Day Name",
        DayTypeLabel::SummerDesignDay => "SummerDesignDay Schedule:Day Name",
        DayTypeLabel::WinterDesignDay => "WinterDesignDay Schedule:Day Name",
        DayTypeLabel::CustomDay1 => "CustomDay1 Schedule:Day Name",
        DayTypeLabel::CustomDay2 => "CustomDay2 Schedule:Day Name",
        DayTypeLabel::Weekdays
        | DayTypeLabel::Weekends
        | DayTypeLabel::AllDays
        | DayTypeLabel::AllOtherDays => return None,
    };
    Some(field)
}

/// Strips an optional leading `For:` keyword from a day-type list.
fn strip_for_prefix(list: &str) -> &str {
    match list.split_at_checked(4) {
        Some((head, rest)) if head.eq_ignore_ascii_case("for:") => rest.trim_start(),
        _ => list,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid test datetime")
    }

    fn hourly_day(name: &str, value: f64) -> IdfObject {
        let mut obj = IdfObject::new("Schedule:Day:Hourly", name);
        for h in 1..=24 {
            obj.set(format!("Hour {h}"), value.to_string());
        }
        obj
    }

    fn doc_with_days() -> Document {
        let mut doc = Document::new();
        doc.add(hourly_day("WorkDay", 1.0));
        doc.add(hourly_day("OffDay", 0.0));
        doc.add(hourly_day("HolidayDay", 0.25));
        doc
    }

    fn week_daily() -> IdfObject {
        let mut obj = IdfObject::new("Schedule:Week:Daily", "Office Week");
        for day in ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"] {
            obj.set(format!("{day} Schedule:Day Name"), "WorkDay");
        }
        for day in ["Saturday", "Sunday"] {
            obj.set(format!("{day} Schedule:Day Name"), "OffDay");
        }
        obj.set("Holiday Schedule:Day Name", "HolidayDay");
        obj
    }

    #[test]
    fn daily_selects_weekday_schedule() {
        let doc = doc_with_days();
        let week = week_daily();
        let options = EvalOptions::default();
        // 2024-01-08 is a Monday, 2024-01-06 a Saturday
        assert_eq!(
            evaluate_week_daily(&week, &doc, dt(2024, 1, 8, 12), &options),
            Ok(1.0)
        );
        assert_eq!(
            evaluate_week_daily(&week, &doc, dt(2024, 1, 6, 12), &options),
            Ok(0.0)
        );
    }

    #[test]
    fn daily_holiday_outranks_weekday() {
        let doc = doc_with_days();
        let week = week_daily();
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid date");
        let options = EvalOptions {
            holidays: [date].into_iter().collect(),
            ..EvalOptions::default()
        };
        assert_eq!(
            evaluate_week_daily(&week, &doc, dt(2024, 1, 8, 12), &options),
            Ok(0.25)
        );
    }

    #[test]
    fn daily_unresolved_reference_is_error() {
        let doc = Document::new();
        let week = week_daily();
        let err = evaluate_week_daily(&week, &doc, dt(2024, 1, 8, 12), &EvalOptions::default());
        assert_eq!(
            err,
            Err(ScheduleError::UnresolvedReference {
                name: "WorkDay".to_string()
            })
        );
    }

    #[test]
    fn daily_without_applicable_entry_is_zero() {
        let doc = doc_with_days();
        let mut week = IdfObject::new("Schedule:Week:Daily", "Sparse");
        week.set("Sunday Schedule:Day Name", "OffDay");
        // Wednesday has no entry anywhere
        assert_eq!(
            evaluate_week_daily(&week, &doc, dt(2024, 1, 10, 12), &EvalOptions::default()),
            Ok(0.0)
        );
    }

    fn week_compact() -> IdfObject {
        let mut obj = IdfObject::new("Schedule:Week:Compact", "Office Week Compact");
        obj.set("DayType List 1", "For: Weekdays");
        obj.set("Schedule:Day Name 1", "WorkDay");
        obj.set("DayType List 2", "AllOtherDays");
        obj.set("Schedule:Day Name 2", "OffDay");
        obj
    }

    #[test]
    fn compact_selects_by_day_type_list() {
        let doc = doc_with_days();
        let week = week_compact();
        let options = EvalOptions::default();
        assert_eq!(
            evaluate_week_compact(&week, &doc, dt(2024, 1, 8, 12), &options),
            Ok(1.0)
        );
        assert_eq!(
            evaluate_week_compact(&week, &doc, dt(2024, 1, 6, 12), &options),
            Ok(0.0)
        );
    }

    #[test]
    fn compact_for_prefix_is_optional() {
        let doc = doc_with_days();
        let mut week = IdfObject::new("Schedule:Week:Compact", "NoPrefix");
        week.set("DayType List 1", "AllDays");
        week.set("Schedule:Day Name 1", "WorkDay");
        assert_eq!(
            evaluate_week_compact(&week, &doc, dt(2024, 1, 8, 12), &EvalOptions::default()),
            Ok(1.0)
        );
    }

    #[test]
    fn compact_unresolved_reference_is_error() {
        let doc = Document::new();
        let week = week_compact();
        let err = evaluate_week_compact(&week, &doc, dt(2024, 1, 8, 12), &EvalOptions::default());
        assert!(matches!(
            err,
            Err(ScheduleError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn compact_without_entries_is_zero() {
        let doc = doc_with_days();
        let week = IdfObject::new("Schedule:Week:Compact", "Empty");
        assert_eq!(
            evaluate_week_compact(&week, &doc, dt(2024, 1, 8, 12), &EvalOptions::default()),
            Ok(0.0)
        );
    }
}
