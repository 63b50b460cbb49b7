//! TOML-based evaluation configuration.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::schedule::{DayOverride, EvalOptions, Interpolation};

/// Top-level evaluation configuration parsed from TOML.
///
/// All fields have defaults matching plain calendar evaluation. Load from
/// TOML with [`EvalConfig::from_toml_file`] or start from
/// [`EvalConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Evaluation timing and mode parameters.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Holiday and custom-day date lists.
    #[serde(default)]
    pub special_days: SpecialDaysConfig,
}

/// Evaluation timing and mode parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Calendar year evaluated against (governs leap handling and
    /// weekday alignment).
    pub year: i32,
    /// Values per hour for day materialization (must divide 60).
    pub timestep: u32,
    /// Interpolation mode: `"no"`, `"step"`, `"average"`, or `"linear"`.
    pub interpolation: String,
    /// Day-type override: `"normal"`, `"summer"`, `"winter"`,
    /// `"holiday"`, `"customday1"`, or `"customday2"`.
    pub day_type: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            timestep: 1,
            interpolation: "no".to_string(),
            day_type: "normal".to_string(),
        }
    }
}

/// Holiday and custom-day date lists, each entry an `M/D` string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecialDaysConfig {
    /// Dates treated as holidays.
    pub holidays: Vec<String>,
    /// Dates treated as CustomDay1.
    pub custom_day_1: Vec<String>,
    /// Dates treated as CustomDay2.
    pub custom_day_2: Vec<String>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"evaluation.timestep"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl EvalConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let e = &self.evaluation;

        if e.timestep == 0 || 60 % e.timestep != 0 {
            errors.push(ConfigError {
                field: "evaluation.timestep".into(),
                message: format!("must divide 60, got {}", e.timestep),
            });
        }
        if Interpolation::from_token(&e.interpolation).is_none() {
            errors.push(ConfigError {
                field: "evaluation.interpolation".into(),
                message: format!(
                    "must be \"no\", \"step\", \"average\", or \"linear\", got \"{}\"",
                    e.interpolation
                ),
            });
        }
        if DayOverride::from_token(&e.day_type).is_none() {
            errors.push(ConfigError {
                field: "evaluation.day_type".into(),
                message: format!(
                    "must be \"normal\", \"summer\", \"winter\", \"holiday\", \
                     \"customday1\", or \"customday2\", got \"{}\"",
                    e.day_type
                ),
            });
        }

        let lists = [
            ("special_days.holidays", &self.special_days.holidays),
            ("special_days.custom_day_1", &self.special_days.custom_day_1),
            ("special_days.custom_day_2", &self.special_days.custom_day_2),
        ];
        for (field, dates) in lists {
            for date in dates {
                if parse_month_day(date, e.year).is_none() {
                    errors.push(ConfigError {
                        field: field.into(),
                        message: format!("\"{date}\" is not a valid M/D date in {}", e.year),
                    });
                }
            }
        }

        errors
    }

    /// Converts the configuration into concrete evaluation options.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if the configuration is
    /// invalid.
    pub fn to_options(&self) -> Result<EvalOptions, ConfigError> {
        if let Some(error) = self.validate().into_iter().next() {
            return Err(error);
        }
        let e = &self.evaluation;
        // Tokens and dates are known-good after validate()
        Ok(EvalOptions {
            day_type: DayOverride::from_token(&e.day_type).unwrap_or_default(),
            interpolation: Interpolation::from_token(&e.interpolation).unwrap_or_default(),
            holidays: date_set(&self.special_days.holidays, e.year),
            custom_day_1: date_set(&self.special_days.custom_day_1, e.year),
            custom_day_2: date_set(&self.special_days.custom_day_2, e.year),
        })
    }
}

/// Resolves a list of `M/D` strings into dates in the given year.
fn date_set(dates: &[String], year: i32) -> HashSet<NaiveDate> {
    dates
        .iter()
        .filter_map(|d| parse_month_day(d, year))
        .collect()
}

/// Parses an `M/D` string into a date in the given year.
fn parse_month_day(value: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = value.trim().split_once('/')?;
    NaiveDate::from_ymd_opt(year, month.trim().parse().ok()?, day.trim().parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EvalConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.evaluation.year, 2024);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[evaluation]
year = 2023
timestep = 4
interpolation = "average"
day_type = "summer"

[special_days]
holidays = ["12/25", "1/1"]
custom_day_1 = ["3/15"]
"#;
        let cfg = EvalConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.year), Some(2023));
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.timestep), Some(4));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[evaluation]
year = 2024
bogus_field = true
"#;
        assert!(EvalConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[evaluation]
year = 2030
"#;
        let cfg = EvalConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.year), Some(2030));
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.timestep), Some(1));
        assert_eq!(cfg.as_ref().map(|c| c.special_days.holidays.len()), Some(0));
    }

    #[test]
    fn validation_catches_bad_timestep() {
        let mut cfg = EvalConfig::default();
        cfg.evaluation.timestep = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "evaluation.timestep"));
    }

    #[test]
    fn validation_catches_bad_day_type() {
        let mut cfg = EvalConfig::default();
        cfg.evaluation.day_type = "bogus".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "evaluation.day_type"));
    }

    #[test]
    fn validation_catches_bad_date() {
        let mut cfg = EvalConfig::default();
        cfg.special_days.holidays.push("13/40".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "special_days.holidays"));
    }

    #[test]
    fn leap_day_holiday_needs_leap_year() {
        let mut cfg = EvalConfig::default();
        cfg.evaluation.year = 2023;
        cfg.special_days.holidays.push("2/29".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "special_days.holidays"));
    }

    #[test]
    fn to_options_builds_date_sets() {
        let mut cfg = EvalConfig::default();
        cfg.special_days.holidays.push("12/25".to_string());
        cfg.evaluation.day_type = "winter".to_string();
        let options = cfg.to_options().ok();
        let christmas = NaiveDate::from_ymd_opt(2024, 12, 25);
        assert_eq!(
            options.as_ref().map(|o| o.holidays.iter().copied().next()),
            Some(christmas)
        );
        assert_eq!(
            options.map(|o| o.day_type),
            Some(DayOverride::WinterDesignDay)
        );
    }

    #[test]
    fn to_options_rejects_invalid_config() {
        let mut cfg = EvalConfig::default();
        cfg.evaluation.timestep = 0;
        assert!(cfg.to_options().is_err());
    }
}
