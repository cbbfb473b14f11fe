/// Daily Data Report page parser
///
/// Parses one monthly "Daily Data Report" page from the climate site into one
/// [`DailyWeatherRecord`] per day. Page layout:
/// - `h1#wb-cont`: heading ending in "... <Month> <Year>"
/// - `div#dynamicDataTable table`: 2 header rows, one row per day, 4 summary rows
/// - day rows: column 0 is the day, columns 1-11 the observations
use chrono::Month;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::planner::FetchTarget;

const HEADER_ROWS: usize = 2;
const FOOTER_ROWS: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageError {
    #[error("Report heading not found or unreadable")]
    MissingHeading,

    #[error("Invalid month number: {0}")]
    InvalidMonth(u32),

    #[error("Report is for {found}, expected {expected}")]
    MonthMismatch { expected: String, found: String },
}

/// What to do with a day row that has fewer than 2 cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Emit a record with every field empty, keeping one emission per row.
    #[default]
    EmitEmpty,
    /// Log the row and emit nothing for it.
    Skip,
}

/// One day of observations, as raw cell text. Empty string means "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeatherRecord {
    pub station: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub max_temp: String,
    pub min_temp: String,
    pub mean_temp: String,
    pub heat_deg_days: String,
    pub cool_deg_days: String,
    #[serde(rename = "totalRainMM")]
    pub total_rain_mm: String,
    #[serde(rename = "totalSnowCM")]
    pub total_snow_cm: String,
    #[serde(rename = "totalPrecipMM")]
    pub total_precip_mm: String,
    #[serde(rename = "snowOnGroundCM")]
    pub snow_on_ground_cm: String,
    #[serde(rename = "dirOfMaxGust10sDEG")]
    pub dir_of_max_gust_10s_deg: String,
    #[serde(rename = "spdOfMaxGustKMH")]
    pub spd_of_max_gust_kmh: String,
}

/// A parsed Daily Data Report document.
pub struct DailyDataPage {
    document: Html,
}

impl DailyDataPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Month name the report claims to cover: the second-to-last word of the heading.
    pub fn reported_month(&self) -> Option<String> {
        let heading_selector = Selector::parse("h1#wb-cont").unwrap();
        let heading = self.document.select(&heading_selector).next()?;

        let text = direct_text(heading)?;
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }
        Some(words[words.len() - 2].to_string())
    }

    /// Check that the report covers `month`. The site silently serves another
    /// month when the requested one has no data.
    pub fn verify_month(&self, month: u32) -> Result<(), PageError> {
        let expected = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(PageError::InvalidMonth(month))?
            .name();

        let found = self.reported_month().ok_or(PageError::MissingHeading)?;
        if found != expected {
            return Err(PageError::MonthMismatch {
                expected: expected.to_string(),
                found,
            });
        }
        Ok(())
    }

    /// Every `<tr>` of the data table, headers and summary rows included.
    pub fn table_rows(&self) -> Vec<ElementRef<'_>> {
        let row_selector = Selector::parse("div#dynamicDataTable table tr").unwrap();
        self.document.select(&row_selector).collect()
    }

    /// The per-day rows: the table minus its 2 header rows and 4 summary rows.
    pub fn data_rows(&self) -> Vec<ElementRef<'_>> {
        let mut rows = self.table_rows();
        if rows.len() <= HEADER_ROWS + FOOTER_ROWS {
            return Vec::new();
        }
        rows.truncate(rows.len() - FOOTER_ROWS);
        rows.drain(..HEADER_ROWS);
        rows
    }

    /// Lazily yield the records of this page for the given request.
    ///
    /// Yields nothing (and logs an error) when the page reports another month.
    pub fn records<'a>(
        &'a self,
        station: &'a str,
        year: i32,
        month: u32,
        policy: MalformedRowPolicy,
    ) -> DailyRecords<'a> {
        let (matched, rows) = match self.verify_month(month) {
            Ok(()) => {
                let rows = self.data_rows();
                info!(
                    "FOUND {} weather observations for {} - {}/{:02}",
                    rows.len(),
                    station,
                    year,
                    month
                );
                (true, rows)
            }
            Err(e) => {
                error!("NO DATA found for {} - {}/{:02} ({})", station, year, month, e);
                (false, Vec::new())
            }
        };

        DailyRecords {
            matched,
            rows: rows.into_iter().enumerate(),
            station,
            year,
            month,
            policy,
        }
    }

    pub fn records_for<'a>(
        &'a self,
        target: &'a FetchTarget,
        policy: MalformedRowPolicy,
    ) -> DailyRecords<'a> {
        self.records(&target.station_name, target.year, target.month, policy)
    }
}

/// Parse a page and collect its records.
pub fn parse_page(
    html: &str,
    station: &str,
    year: i32,
    month: u32,
    policy: MalformedRowPolicy,
) -> Vec<DailyWeatherRecord> {
    let page = DailyDataPage::parse(html);
    page.records(station, year, month, policy).collect()
}

/// Iterator over the records of one page, one per data row.
pub struct DailyRecords<'a> {
    matched: bool,
    rows: std::iter::Enumerate<std::vec::IntoIter<ElementRef<'a>>>,
    station: &'a str,
    year: i32,
    month: u32,
    policy: MalformedRowPolicy,
}

impl DailyRecords<'_> {
    /// False when the page reported a different month and was skipped.
    pub fn matched(&self) -> bool {
        self.matched
    }
}

impl Iterator for DailyRecords<'_> {
    type Item = DailyWeatherRecord;

    fn next(&mut self) -> Option<DailyWeatherRecord> {
        for (idx, row) in self.rows.by_ref() {
            let cells: Vec<ElementRef<'_>> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "td")
                .collect();

            if cells.len() < 2 {
                error!(
                    "NO FIELDS for {} - {}/{:02} (row {})",
                    self.station,
                    self.year,
                    self.month,
                    idx + 1
                );
                match self.policy {
                    MalformedRowPolicy::EmitEmpty => return Some(DailyWeatherRecord::default()),
                    MalformedRowPolicy::Skip => continue,
                }
            }

            let date = format!("{}-{:02}-{:02}", self.year, self.month, idx + 1);
            debug!("FOUND {} fields for {} - {}", cells.len(), self.station, date);
            if cells.len() < 12 {
                warn!(
                    "Row for {} has {} cells, missing columns left empty",
                    date,
                    cells.len()
                );
            }

            let cell = |col: usize| -> String {
                cells
                    .get(col)
                    .and_then(|c| direct_text(*c))
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default()
            };

            return Some(DailyWeatherRecord {
                station: self.station.to_string(),
                date,
                max_temp: cell(1),
                min_temp: cell(2),
                mean_temp: cell(3),
                heat_deg_days: cell(4),
                cool_deg_days: cell(5),
                total_rain_mm: cell(6),
                total_snow_cm: cell(7),
                total_precip_mm: cell(8),
                snow_on_ground_cm: cell(9),
                dir_of_max_gust_10s_deg: cell(10),
                spd_of_max_gust_kmh: cell(11),
            });
        }
        None
    }
}

/// First non-blank text node directly under `element` (not inside child elements).
fn direct_text(element: ElementRef<'_>) -> Option<&str> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .find(|text| !text.trim().is_empty())
}
