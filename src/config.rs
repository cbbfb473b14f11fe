use std::env;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::parser::MalformedRowPolicy;
use crate::stations::{Station, StationTable};

/// Daily data report page on the Environment Canada climate site.
pub const DEFAULT_BASE_URL: &str = "http://climate.weather.gc.ca/climate_data/daily_data_e.html";
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required parameter `run_from`")]
    MissingRunFrom,
    #[error("Invalid date '{0}': expected YYYY-MM-DD or YYYY-MM")]
    InvalidDate(String),
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("Invalid station '{0}': expected ID=NAME with a numeric ID")]
    InvalidStation(String),
    #[error("Duplicate station id: {0}")]
    DuplicateStation(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub run_from: NaiveDate,
    /// `None` means "through the end of the current month".
    pub run_to: Option<NaiveDate>,
    pub concurrency: usize,
    pub timeout_secs: u64,
    /// `None` writes records to stdout.
    pub output_path: Option<PathBuf>,
    pub stations: StationTable,
    pub malformed_rows: MalformedRowPolicy,
}

impl Config {
    /// Validate the run parameters and fill every other option with its default.
    pub fn new(run_from: Option<NaiveDate>, run_to: Option<NaiveDate>) -> Result<Self, ConfigError> {
        let run_from = run_from.ok_or(ConfigError::MissingRunFrom)?;

        Ok(Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            run_from,
            run_to,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_path: None,
            stations: StationTable::default(),
            malformed_rows: MalformedRowPolicy::default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let run_from = optional_var("RUN_FROM")
            .map(|v| parse_run_date(&v))
            .transpose()?;
        let run_to = optional_var("RUN_TO").map(|v| parse_run_date(&v)).transpose()?;

        let mut config = Config::new(run_from, run_to)?;

        if let Some(base_url) = optional_var("CLIMATE_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(value) = optional_var("FETCH_CONCURRENCY") {
            config.concurrency = parse_number("concurrency", &value)?;
        }
        if let Some(value) = optional_var("HTTP_TIMEOUT_SECS") {
            config.timeout_secs = parse_number("timeout_secs", &value)?;
        }
        config.output_path = optional_var("OUTPUT_PATH").map(PathBuf::from);

        // CLIMATE_STATIONS="10999=London CS;50093=London A"
        if let Some(value) = optional_var("CLIMATE_STATIONS") {
            let stations = value
                .split(';')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<Station>)
                .collect::<Result<Vec<_>, _>>()?;
            config.stations = StationTable::new(stations)?;
        }

        if let Some(value) = optional_var("SKIP_MALFORMED_ROWS") {
            config.malformed_rows = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => MalformedRowPolicy::Skip,
                "0" | "false" | "no" => MalformedRowPolicy::EmitEmpty,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "SKIP_MALFORMED_ROWS",
                        value,
                    })
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject option values the crawl cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "concurrency",
                value: self.concurrency.to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs",
                value: self.timeout_secs.to_string(),
            });
        }
        Ok(())
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Parse a run date given as `YYYY-MM-DD` or `YYYY-MM` (first of the month).
pub fn parse_run_date(value: &str) -> Result<NaiveDate, ConfigError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .map_err(|_| ConfigError::InvalidDate(value.to_string()))
}

/// Last calendar day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
