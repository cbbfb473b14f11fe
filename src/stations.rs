/// Station table for the Environment Canada climate scraper.
///
/// The scraper only ever requests data for the stations held in a
/// [`StationTable`]. The table is an immutable value handed to the planner,
/// so callers (and tests) can swap in their own set of stations.
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// A single weather observation site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Climate site `StationID` query parameter (e.g. "10999").
    pub id: String,
    /// Display name emitted on every record (e.g. "London CS").
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Parses the `ID=NAME` form used by `--station`.
impl FromStr for Station {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (id, name) = value
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidStation(value.to_string()))?;

        let id = id.trim();
        let name = name.trim();
        if id.is_empty() || name.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidStation(value.to_string()));
        }

        Ok(Station::new(id, name))
    }
}

/// Ordered, duplicate-free set of stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    /// Build a table, rejecting duplicate station ids.
    pub fn new(stations: Vec<Station>) -> Result<Self, ConfigError> {
        for (idx, station) in stations.iter().enumerate() {
            if stations[..idx].iter().any(|s| s.id == station.id) {
                return Err(ConfigError::DuplicateStation(station.id.clone()));
            }
        }
        Ok(Self { stations })
    }

    /// The three London, Ontario stations scraped by default.
    pub fn london_ontario() -> Self {
        Self {
            stations: vec![
                Station::new("10999", "London CS"),
                Station::new("50093", "London A"),
                Station::new("4789", "London Airport"),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::london_ontario()
    }
}
