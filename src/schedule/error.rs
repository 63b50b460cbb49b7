//! Error taxonomy for schedule parsing and evaluation.

use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong while parsing, evaluating, or building a
/// schedule.
///
/// Missing data is deliberately *not* an error: an absent field or an
/// unmatched rule resolves to `0.0` so that partial, hand-edited schedules
/// survive batch evaluation. Errors are reserved for malformed input
/// (corrupt model), dangling references (structurally incomplete model),
/// and builder contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// A time string that does not follow `H[H]:MM[:SS]` or bare `H[H]`.
    #[error("cannot parse time {input:?}")]
    MalformedTime {
        /// The offending time string.
        input: String,
    },

    /// A field expected to hold a number held something else.
    #[error("cannot parse numeric field {field:?}: {input:?}")]
    MalformedNumber {
        /// Name of the field being parsed.
        field: String,
        /// The offending value.
        input: String,
    },

    /// A month/day pair that is not a real calendar date in the query year.
    #[error("{month}/{day} is not a valid date in year {year}")]
    InvalidDate {
        /// Query year.
        year: i32,
        /// Parsed month (1-12 expected).
        month: u32,
        /// Parsed day of month.
        day: u32,
    },

    /// The object's type is not one of the supported schedule types.
    #[error("unsupported schedule type {object_type:?}")]
    UnsupportedType {
        /// The object's declared type.
        object_type: String,
    },

    /// A referenced week or day schedule could not be resolved by name.
    #[error("referenced schedule {name:?} not found")]
    UnresolvedReference {
        /// The dangling schedule name.
        name: String,
    },

    /// A `Schedule:Year` has no date range covering the query date.
    #[error("no date range covers {date}")]
    NoMatchingDateRange {
        /// The uncovered query date.
        date: NaiveDate,
    },

    /// The builder was given an hourly array whose length does not match
    /// the declared year.
    #[error("expected {expected} hourly values for year {year}, got {actual}")]
    LengthMismatch {
        /// Declared calendar year.
        year: i32,
        /// 8760 or 8784 depending on the year.
        expected: usize,
        /// What the caller actually supplied.
        actual: usize,
    },

    /// A per-hour sample count that does not divide the hour evenly.
    #[error("timestep {timestep} does not divide 60")]
    InvalidTimestep {
        /// The offending values-per-hour count.
        timestep: u32,
    },
}
