//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use epsched::document::Document;
use epsched::object::IdfObject;

/// Builds a `Schedule:Compact` object from a flat field list.
pub fn compact_object(name: &str, fields: &[&str]) -> IdfObject {
    let mut obj = IdfObject::new("Schedule:Compact", name);
    for (i, field) in fields.iter().enumerate() {
        obj.set(format!("Field {}", i + 1), *field);
    }
    obj
}

/// Builds a `Schedule:Day:Hourly` holding one value for all 24 hours.
pub fn hourly_day(name: &str, value: f64) -> IdfObject {
    let mut obj = IdfObject::new("Schedule:Day:Hourly", name);
    for h in 1..=24 {
        obj.set(format!("Hour {h}"), value.to_string());
    }
    obj
}

/// Builds a `Schedule:Week:Compact` mapping `AllDays` to one day schedule.
pub fn all_days_week(name: &str, day_name: &str) -> IdfObject {
    let mut obj = IdfObject::new("Schedule:Week:Compact", name);
    obj.set("DayType List 1", "For: AllDays");
    obj.set("Schedule:Day Name 1", day_name);
    obj
}

/// A document with a seasonal `Schedule:Year`: a heating week spanning
/// the year boundary (Nov 1 through Feb 28) and a cooling week for the
/// remaining months.
pub fn seasonal_document() -> Document {
    let mut doc = Document::new();
    doc.add(hourly_day("HeatingDay", 21.0));
    doc.add(hourly_day("CoolingDay", 26.0));
    doc.add(all_days_week("HeatingWeek", "HeatingDay"));
    doc.add(all_days_week("CoolingWeek", "CoolingDay"));

    let mut year = IdfObject::new("Schedule:Year", "Seasonal Setpoint");
    year.set("Schedule:Week Name 1", "HeatingWeek");
    year.set("Start Month 1", "11");
    year.set("Start Day 1", "1");
    year.set("End Month 1", "2");
    year.set("End Day 1", "28");
    year.set("Schedule:Week Name 2", "CoolingWeek");
    year.set("Start Month 2", "3");
    year.set("Start Day 2", "1");
    year.set("End Month 2", "10");
    year.set("End Day 2", "31");
    doc.add(year);
    doc
}

/// A datetime in the proleptic calendar, panicking on invalid components
/// (test inputs are always valid).
pub fn dt(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid test datetime")
}
