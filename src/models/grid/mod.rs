// Grid module
// Calendar grid granularity and grid-line descriptors

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::date::Timestamp;

/// Calendar granularity an interval span or a grid cell is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridUnit {
    Day,
    Month,
    Year,
}

impl GridUnit {
    pub const ALL: [GridUnit; 3] = [GridUnit::Day, GridUnit::Month, GridUnit::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            GridUnit::Day => "day",
            GridUnit::Month => "month",
            GridUnit::Year => "year",
        }
    }

    /// Accepted `value` range for a grid of this unit.
    pub fn value_range(&self) -> RangeInclusive<u32> {
        match self {
            GridUnit::Day => 1..=365,
            GridUnit::Month => 1..=12,
            GridUnit::Year => 1..=10,
        }
    }
}

impl fmt::Display for GridUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(GridUnit::Day),
            "month" | "months" => Ok(GridUnit::Month),
            "year" | "years" => Ok(GridUnit::Year),
            other => Err(format!("Unknown grid unit '{}'", other)),
        }
    }
}

/// Active grid: cells of `value` consecutive `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub unit: GridUnit,
    pub value: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            unit: GridUnit::Month,
            value: 1,
        }
    }
}

impl GridSettings {
    /// Create validated grid settings
    pub fn new(unit: GridUnit, value: u32) -> Result<Self, String> {
        let settings = Self { unit, value };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        let range = self.unit.value_range();
        if !range.contains(&self.value) {
            return Err(format!(
                "Grid value {} is out of range for {} grid ({}..={})",
                self.value,
                self.unit,
                range.start(),
                range.end()
            ));
        }
        Ok(())
    }
}

impl fmt::Display for GridSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// A vertical grid line produced by grid-line enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub time: Timestamp,
    pub x: f64,
    /// Emphasised line: month starts on a day grid, year starts on a month grid,
    /// every line on a year grid.
    pub major: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(GridUnit::Day, 1, true)]
    #[test_case(GridUnit::Day, 365, true)]
    #[test_case(GridUnit::Day, 366, false)]
    #[test_case(GridUnit::Month, 12, true)]
    #[test_case(GridUnit::Month, 13, false)]
    #[test_case(GridUnit::Year, 10, true)]
    #[test_case(GridUnit::Year, 11, false)]
    #[test_case(GridUnit::Year, 0, false)]
    fn test_grid_settings_validation(unit: GridUnit, value: u32, valid: bool) {
        assert_eq!(GridSettings::new(unit, value).is_ok(), valid);
    }

    #[test]
    fn test_grid_unit_parse() {
        assert_eq!("Month".parse::<GridUnit>(), Ok(GridUnit::Month));
        assert_eq!(" days ".parse::<GridUnit>(), Ok(GridUnit::Day));
        assert!("week".parse::<GridUnit>().is_err());
    }

    #[test]
    fn test_grid_unit_serializes_lowercase() {
        let json = serde_json::to_string(&GridUnit::Year).unwrap();
        assert_eq!(json, "\"year\"");
        let parsed: GridUnit = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(parsed, GridUnit::Day);
        assert!(serde_json::from_str::<GridUnit>("\"fortnight\"").is_err());
    }

    #[test]
    fn test_default_grid_is_one_month() {
        let grid = GridSettings::default();
        assert_eq!(grid.unit, GridUnit::Month);
        assert_eq!(grid.value, 1);
        assert_eq!(grid.to_string(), "1 month");
    }
}
