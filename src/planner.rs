/// Request planning
///
/// Turns a run window and a station table into the list of daily-data pages to
/// fetch: one [`FetchTarget`] per (station, month). No I/O happens here.
use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, info, instrument};

use crate::config::{end_of_month, Config, ConfigError};
use crate::stations::StationTable;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

/// Inclusive range of calendar months. Iterating it is repeatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    first: YearMonth,
    last: YearMonth,
}

impl MonthRange {
    /// Every month touched by `[from, to]`. Empty when `to` falls in an earlier month than `from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            first: YearMonth::of(from),
            last: YearMonth::of(to),
        }
    }

    pub fn iter(&self) -> Months {
        Months {
            next: (self.first <= self.last).then_some(self.first),
            last: self.last,
        }
    }

    pub fn len(&self) -> usize {
        if self.first > self.last {
            return 0;
        }
        let span = (self.last.year - self.first.year) * 12 + self.last.month as i32
            - self.first.month as i32;
        span as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for &MonthRange {
    type Item = YearMonth;
    type IntoIter = Months;

    fn into_iter(self) -> Months {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Months {
    next: Option<YearMonth>,
    last: YearMonth,
}

impl Iterator for Months {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        self.next = (current < self.last).then(|| current.succ());
        Some(current)
    }
}

/// One planned page fetch, with the metadata the parser needs back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub station_id: String,
    pub station_name: String,
    pub year: i32,
    pub month: u32,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct RequestPlanner {
    base_url: String,
    stations: StationTable,
}

impl RequestPlanner {
    pub fn new(base_url: impl Into<String>, stations: StationTable) -> Self {
        Self {
            base_url: base_url.into(),
            stations,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.stations.clone())
    }

    /// Plan every (station, month) fetch between `run_from` and `run_to`.
    ///
    /// A missing `run_to` means "through the end of the current month".
    pub fn plan(
        &self,
        run_from: Option<NaiveDate>,
        run_to: Option<NaiveDate>,
    ) -> Result<Vec<FetchTarget>, ConfigError> {
        self.plan_as_of(run_from, run_to, Local::now().date_naive())
    }

    /// Same as [`plan`](Self::plan) with an explicit "today".
    #[instrument(skip(self), fields(stations = self.stations.len()))]
    pub fn plan_as_of(
        &self,
        run_from: Option<NaiveDate>,
        run_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<FetchTarget>, ConfigError> {
        let run_from = run_from.ok_or(ConfigError::MissingRunFrom)?;
        let run_to = run_to.unwrap_or_else(|| end_of_month(today));

        info!(
            "Generating requests for parameters RUN FROM={}, RUN TO={}",
            run_from, run_to
        );

        let months = MonthRange::new(run_from, run_to);
        let mut targets = Vec::with_capacity(self.stations.len() * months.len());

        for station in self.stations.iter() {
            for ym in &months {
                debug!(station = %station, year = ym.year, month = ym.month, "Planned fetch");
                targets.push(FetchTarget {
                    station_id: station.id.clone(),
                    station_name: station.name.clone(),
                    year: ym.year,
                    month: ym.month,
                    url: self.build_url(&station.id, ym.year, ym.month),
                });
            }
        }

        info!(
            "Planned {} requests ({} stations x {} months)",
            targets.len(),
            self.stations.len(),
            months.len()
        );

        Ok(targets)
    }

    pub fn build_url(&self, station_id: &str, year: i32, month: u32) -> String {
        format!(
            "{}?StationID={}&Prov=ON&Month={:02}&Year={:04}",
            self.base_url, station_id, month, year
        )
    }
}
