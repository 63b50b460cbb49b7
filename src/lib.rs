//! Schedule toolkit for EnergyPlus building models.
//!
//! Evaluates every standard schedule object type (constant, hourly, interval,
//! list, compact, week, year) as a time-indexed value function, and builds the
//! inverse: compressing an 8760/8784-hour array back into the compact
//! Through/For/Until text format.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod document;
pub mod io;
pub mod object;
/// Schedule parsers, evaluators, and the compact-schedule builder.
pub mod schedule;
