//! CSV import and export of hourly value series.

pub mod export;
