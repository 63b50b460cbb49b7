//! Type-dispatched schedule evaluation and annual materialization.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::document::Document;
use crate::object::IdfObject;

use super::builder::is_leap_year;
use super::compact::{evaluate_compact, evaluate_parsed, parse_compact};
use super::day;
use super::error::ScheduleError;
use super::types::EvalOptions;
use super::week::{evaluate_week_compact, evaluate_week_daily};
use super::year::evaluate_year;

/// The supported schedule object types as a closed sum, so dispatch is
/// exhaustive at compile time instead of string comparison at every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// `Schedule:Constant`
    Constant,
    /// `Schedule:Day:Hourly`
    DayHourly,
    /// `Schedule:Day:Interval`
    DayInterval,
    /// `Schedule:Day:List`
    DayList,
    /// `Schedule:Week:Daily`
    WeekDaily,
    /// `Schedule:Week:Compact`
    WeekCompact,
    /// `Schedule:Year`
    Year,
    /// `Schedule:Compact`
    Compact,
}

impl ScheduleKind {
    /// Every supported kind, in dispatch order.
    pub const ALL: [Self; 8] = [
        Self::Constant,
        Self::DayHourly,
        Self::DayInterval,
        Self::DayList,
        Self::WeekDaily,
        Self::WeekCompact,
        Self::Year,
        Self::Compact,
    ];

    /// Maps an object type string to its kind, ignoring case.
    pub fn from_object_type(obj_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.object_type().eq_ignore_ascii_case(obj_type.trim()))
    }

    /// The canonical object type string for this kind.
    pub fn object_type(self) -> &'static str {
        match self {
            Self::Constant => "Schedule:Constant",
            Self::DayHourly => "Schedule:Day:Hourly",
            Self::DayInterval => "Schedule:Day:Interval",
            Self::DayList => "Schedule:Day:List",
            Self::WeekDaily => "Schedule:Week:Daily",
            Self::WeekCompact => "Schedule:Week:Compact",
            Self::Year => "Schedule:Year",
            Self::Compact => "Schedule:Compact",
        }
    }
}

/// Classifies an object, or reports it as not a schedule.
pub fn kind_of(obj: &IdfObject) -> Result<ScheduleKind, ScheduleError> {
    ScheduleKind::from_object_type(&obj.obj_type).ok_or_else(|| ScheduleError::UnsupportedType {
        object_type: obj.obj_type.clone(),
    })
}

/// Finds a schedule object of any supported kind by name, ignoring case.
pub fn find_schedule<'a>(doc: &'a Document, name: &str) -> Option<&'a IdfObject> {
    doc.iter()
        .find(|o| ScheduleKind::from_object_type(&o.obj_type).is_some() && o.is_named(name))
}

/// Evaluates any schedule object at a datetime.
///
/// Dispatches on the object's declared type. `doc` is only consulted for
/// week and year schedules, which resolve references against it.
///
/// # Errors
///
/// Propagates the underlying evaluator's errors: malformed fields for any
/// kind, reference errors for week/year kinds, and
/// [`ScheduleError::UnsupportedType`] when the object is not a schedule.
pub fn evaluate(
    obj: &IdfObject,
    doc: &Document,
    at: NaiveDateTime,
    options: &EvalOptions,
) -> Result<f64, ScheduleError> {
    match kind_of(obj)? {
        ScheduleKind::Constant => day::evaluate_constant(obj),
        ScheduleKind::DayHourly => day::evaluate_hourly(obj, at.time()),
        ScheduleKind::DayInterval => {
            day::evaluate_interval(obj, at.time(), options.interpolation)
        }
        ScheduleKind::DayList => day::evaluate_list(obj, at.time(), options.interpolation),
        ScheduleKind::WeekDaily => evaluate_week_daily(obj, doc, at, options),
        ScheduleKind::WeekCompact => evaluate_week_compact(obj, doc, at, options),
        ScheduleKind::Year => evaluate_year(obj, doc, at, options),
        ScheduleKind::Compact => evaluate_compact(obj, at, options),
    }
}

/// Materializes a schedule as one value per hour of `year` (8760, or
/// 8784 for a leap year), starting January 1, 00:00.
///
/// Compact schedules are parsed once up front rather than per hour; every
/// other kind evaluates through [`evaluate`].
pub fn annual_values(
    obj: &IdfObject,
    doc: &Document,
    year: i32,
    options: &EvalOptions,
) -> Result<Vec<f64>, ScheduleError> {
    annual_values_with_timestep(obj, doc, year, 1, options)
}

/// Like [`annual_values`] but with `timestep` samples per hour, for
/// sub-hourly export.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTimestep`] unless `timestep` divides
/// 60 evenly, plus any evaluation error.
pub fn annual_values_with_timestep(
    obj: &IdfObject,
    doc: &Document,
    year: i32,
    timestep: u32,
    options: &EvalOptions,
) -> Result<Vec<f64>, ScheduleError> {
    if timestep == 0 || 60 % timestep != 0 {
        return Err(ScheduleError::InvalidTimestep { timestep });
    }
    let minutes_per_step = 60 / timestep;

    let kind = kind_of(obj)?;
    let parsed = if kind == ScheduleKind::Compact {
        Some(parse_compact(obj)?)
    } else {
        None
    };

    let days = if is_leap_year(year) { 366 } else { 365 };
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ScheduleError::InvalidDate {
        year,
        month: 1,
        day: 1,
    })?;

    let mut values = Vec::with_capacity(days * 24 * timestep as usize);
    for day_index in 0..days {
        let date = jan1
            .checked_add_days(Days::new(day_index as u64))
            .ok_or(ScheduleError::InvalidDate {
                year,
                month: 12,
                day: 31,
            })?;
        for hour in 0..24 {
            for step in 0..timestep {
                let at = date
                    .and_hms_opt(hour, step * minutes_per_step, 0)
                    .ok_or(ScheduleError::InvalidDate {
                        year,
                        month: date.month(),
                        day: date.day(),
                    })?;
                let value = match &parsed {
                    Some(schedule) => evaluate_parsed(schedule, at, options),
                    None => evaluate(obj, doc, at, options)?,
                };
                values.push(value);
            }
        }
    }
    Ok(values)
}
