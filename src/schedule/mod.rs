//! Schedule parsing, evaluation, and construction.
//!
//! Every evaluator is a pure function of the schedule object's fields, the
//! query datetime, and caller-supplied date sets — no caches, no shared
//! state. Entry points:
//!
//! - [`evaluate`] / [`annual_values`] — type-dispatched evaluation of any
//!   schedule object.
//! - [`builder`] — the inverse: compress hourly arrays into `Schedule:Compact`
//!   fields.
//! - [`holidays`] — expand `RunPeriodControl:SpecialDays` objects into the
//!   date sets day-type classification consumes.

pub mod builder;
pub mod clock;
pub mod compact;
pub mod day;
mod error;
pub mod evaluate;
pub mod holidays;
pub mod types;
pub mod week;
pub mod year;

pub use error::ScheduleError;
pub use evaluate::{
    ScheduleKind, annual_values, annual_values_with_timestep, evaluate, find_schedule,
};
pub use types::{
    CompactDayRule, CompactPeriod, DayOverride, DayTypeLabel, DayTypeSet, EvalOptions,
    Interpolation, SpecialDay, TimeValue,
};
