//! Institute settings loading from config.toml
//!
//! The config file names the institute, lists the classes offered (used for
//! autocomplete), and sets the default due date of each fee term. Every
//! section is optional; a missing file yields the built-in defaults.

use crate::core::term_status::TERM_COUNT;
use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// General institute details
    pub institute: InstituteSettings,
    /// Fee defaults
    pub fees: FeeSettings,
    /// Class names offered, e.g. `["9", "10", "11", "12"]`
    pub classes: Vec<String>,
}

/// General institute details
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InstituteSettings {
    /// Name shown in report headers
    pub name: String,
}

impl Default for InstituteSettings {
    fn default() -> Self {
        Self {
            name: "Smart Institute".to_string(),
        }
    }
}

/// Fee defaults applied when a fee record is created without due dates
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeeSettings {
    /// Due date of each term as `MM-DD` within the year the record is created
    pub term_due_dates: Vec<String>,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            term_due_dates: vec!["04-30".to_string(), "08-31".to_string(), "12-31".to_string()],
        }
    }
}

impl FeeSettings {
    /// Resolves the configured term due dates against the year of `today`.
    ///
    /// Terms without a configured entry get no due date.
    pub fn default_due_dates(&self, today: NaiveDate) -> Result<[Option<NaiveDate>; TERM_COUNT]> {
        self.due_dates_with(today, [None; TERM_COUNT])
    }

    /// Like [`FeeSettings::default_due_dates`], but terms with an override keep
    /// it and their configured default is never resolved.
    pub fn due_dates_with(
        &self,
        today: NaiveDate,
        overrides: [Option<NaiveDate>; TERM_COUNT],
    ) -> Result<[Option<NaiveDate>; TERM_COUNT]> {
        let mut dates = overrides;
        for (slot, raw) in dates.iter_mut().zip(&self.term_due_dates) {
            if slot.is_none() {
                *slot = Some(parse_month_day(raw, today.year())?);
            }
        }
        Ok(dates)
    }
}

/// Parses `MM-DD` within `year`; `02-29` falls back to `02-28` outside leap years.
fn parse_month_day(raw: &str, year: i32) -> Result<NaiveDate> {
    let month_day = raw.trim();
    let invalid = |reason: String| Error::Config {
        message: format!("Invalid term due date '{raw}' (expected MM-DD): {reason}"),
    };
    match NaiveDate::parse_from_str(&format!("{year}-{month_day}"), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) if month_day == "02-29" => NaiveDate::from_ymd_opt(year, 2, 28)
            .ok_or_else(|| invalid(format!("year {year} is out of range"))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Loads institute configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A term due date is not a valid `MM-DD`
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.fees.term_due_dates.len() > TERM_COUNT {
        return Err(Error::Config {
            message: format!(
                "fees.term_due_dates has {} entries, at most {TERM_COUNT} allowed",
                config.fees.term_due_dates.len()
            ),
        });
    }
    // Validate against a leap year so 02-29 is accepted
    let mut previous: Option<NaiveDate> = None;
    for raw in &config.fees.term_due_dates {
        let due = parse_month_day(raw, 2024)?;
        if previous.is_some_and(|prev| due < prev) {
            return Err(Error::Config {
                message: format!("fees.term_due_dates must be in order, '{raw}' comes too early"),
            });
        }
        previous = Some(due);
    }

    Ok(config)
}

/// Loads configuration from `./config.toml`, using defaults when the file
/// does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::warn!("config.toml not found, using built-in defaults");
        Ok(Config::default())
    }
}
