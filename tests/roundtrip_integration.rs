//! Round-trip law: building a compact schedule from hourly values and
//! re-evaluating it must reproduce the original array within tolerance.

use chrono::NaiveDate;
use epsched::document::Document;
use epsched::schedule::builder::{DEFAULT_TOLERANCE, create_compact_schedule};
use epsched::schedule::{EvalOptions, annual_values};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-6;

/// Number of days in a month of a year.
fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month");
    next.signed_duration_since(first).num_days() as u32
}

/// Builds a compact schedule from `values`, evaluates it back over the
/// same year, and asserts hour-by-hour agreement within `TOL`.
fn assert_round_trip(values: &[f64], year: i32) {
    let mut doc = Document::new();
    create_compact_schedule(&mut doc, "RT", values, year, "", DEFAULT_TOLERANCE)
        .expect("builder accepts a matching length");
    let obj = doc
        .find("Schedule:Compact", "RT")
        .expect("builder added the schedule");

    let evaluated =
        annual_values(obj, &doc, year, &EvalOptions::default()).expect("round trip evaluates");
    assert_eq!(evaluated.len(), values.len());
    for (hour, (expected, actual)) in values.iter().zip(&evaluated).enumerate() {
        assert!(
            (expected - actual).abs() <= TOL,
            "mismatch at hour {hour}: {expected} vs {actual}"
        );
    }
}

#[test]
fn constant_year_round_trips() {
    assert_round_trip(&[0.42; 8760], 2023);
}

#[test]
fn binary_on_off_round_trips() {
    let mut day = [0.0; 24];
    day[8..18].fill(1.0);
    let values: Vec<f64> = day.iter().copied().cycle().take(8760).collect();
    assert_round_trip(&values, 2023);
}

#[test]
fn alternating_hours_round_trip() {
    let day: Vec<f64> = (0..24).map(|h| f64::from(h % 2)).collect();
    let values: Vec<f64> = day.iter().copied().cycle().take(8760).collect();
    assert_round_trip(&values, 2023);
}

#[test]
fn monthly_varying_profiles_round_trip() {
    let year = 2023;
    let mut values = Vec::with_capacity(8760);
    for month in 1..=12u32 {
        let base = f64::from(month) / 12.0;
        let start_hour = (6 - month % 6) as usize;
        let mut profile = [0.0; 24];
        for slot in profile.iter_mut().skip(start_hour).take(12) {
            *slot = base;
        }
        for _ in 0..days_in_month(year, month) {
            values.extend_from_slice(&profile);
        }
    }
    assert_eq!(values.len(), 8760);
    assert_round_trip(&values, year);
}

#[test]
fn leap_year_round_trips() {
    let day: Vec<f64> = [0.0, 0.5, 1.0, 0.5]
        .iter()
        .flat_map(|v| std::iter::repeat_n(*v, 6))
        .collect();
    let values: Vec<f64> = day.iter().copied().cycle().take(8784).collect();
    assert_round_trip(&values, 2024);
}

#[test]
fn random_monthly_profiles_round_trip() {
    // Random values, structured runs: one random profile per month keeps
    // the emitted schedule well inside the parser's field cap.
    let year = 2023;
    let mut rng = StdRng::seed_from_u64(7);
    let mut values = Vec::with_capacity(8760);
    for month in 1..=12u32 {
        // Four random 6-hour levels per day
        let mut profile = [0.0f64; 24];
        for block in 0..4 {
            let level = (rng.random_range(0..=1000) as f64) / 1000.0;
            profile[block * 6..(block + 1) * 6].fill(level);
        }
        for _ in 0..days_in_month(year, month) {
            values.extend_from_slice(&profile);
        }
    }
    assert_round_trip(&values, year);
}

#[test]
fn near_identical_days_group_within_tolerance() {
    let mut values = vec![0.5; 8760];
    // Perturbations below the grouping tolerance must not break the trip
    let mut rng = StdRng::seed_from_u64(99);
    for value in values.iter_mut() {
        *value += (rng.random_range(0..100) as f64) * 1e-9;
    }
    assert_round_trip(&values, 2023);
}

#[test]
fn fifteen_digit_values_survive_the_trip() {
    let values = vec![0.123456789012345; 8760];
    assert_round_trip(&values, 2023);
}
