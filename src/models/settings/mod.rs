// Settings module
// Editor configuration, loaded from TOML by services::config

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::grid::GridSettings;
use crate::utils::date::{Calendar, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub grid: GridSettings,
    /// Reject creates, moves and resizes that would overlap another interval on the same layer
    pub prevent_overlap: bool,
    pub base_pixels_per_cell: f64,
    /// Fraction of a cell width the pointer must travel before a drag commits
    pub drag_threshold_cells: f64,
    pub handle_width_px: f64,
    /// Window in which a second activation counts as a double activation
    pub double_activation_ms: i64,
    /// Ceiling on grid-line enumeration
    pub max_grid_lines: usize,
    /// IANA zone name used for calendar arithmetic and display
    pub display_timezone: String,
    /// Instant used to derive the pixel scale of month and year grids.
    /// `None` uses the current time.
    pub reference_instant: Option<Timestamp>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            prevent_overlap: true,
            base_pixels_per_cell: 60.0,
            drag_threshold_cells: 0.5,
            handle_width_px: 6.0,
            double_activation_ms: 400,
            max_grid_lines: 2000,
            display_timezone: "UTC".to_string(),
            reference_instant: None,
        }
    }
}

impl EditorSettings {
    pub fn validate(&self) -> Result<(), String> {
        self.grid.validate()?;

        if !self.base_pixels_per_cell.is_finite() || self.base_pixels_per_cell <= 0.0 {
            return Err("Base pixels per cell must be a positive number".to_string());
        }

        if !self.drag_threshold_cells.is_finite() || self.drag_threshold_cells < 0.0 {
            return Err("Drag threshold must be zero or positive".to_string());
        }

        if !self.handle_width_px.is_finite() || self.handle_width_px < 0.0 {
            return Err("Handle width must be zero or positive".to_string());
        }

        if self.double_activation_ms < 0 {
            return Err("Double activation window cannot be negative".to_string());
        }

        if self.max_grid_lines == 0 {
            return Err("Grid line limit must be at least 1".to_string());
        }

        Calendar::from_zone_name(&self.display_timezone)?;

        Ok(())
    }

    pub fn calendar(&self) -> Result<Calendar, String> {
        Calendar::from_zone_name(&self.display_timezone)
    }

    /// Reference instant for the global pixel scale.
    pub fn resolve_reference_instant(&self) -> Timestamp {
        self.reference_instant
            .unwrap_or_else(|| Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::GridUnit;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EditorSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.prevent_overlap);
        assert_eq!(settings.drag_threshold_cells, 0.5);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let settings = EditorSettings {
            grid: GridSettings {
                unit: GridUnit::Month,
                value: 0,
            },
            ..EditorSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_zone_rejected() {
        let settings = EditorSettings {
            display_timezone: "Nowhere/Special".to_string(),
            ..EditorSettings::default()
        };
        assert!(settings.validate().unwrap_err().contains("Nowhere/Special"));
    }

    #[test]
    fn test_pinned_reference_instant() {
        let settings = EditorSettings {
            reference_instant: Some(1_700_000_000_000),
            ..EditorSettings::default()
        };
        assert_eq!(settings.resolve_reference_instant(), 1_700_000_000_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: EditorSettings = toml::from_str(
            r#"
            prevent_overlap = false

            [grid]
            unit = "day"
            value = 7
            "#,
        )
        .unwrap();
        assert!(!settings.prevent_overlap);
        assert_eq!(settings.grid.unit, GridUnit::Day);
        assert_eq!(settings.grid.value, 7);
        assert_eq!(settings.base_pixels_per_cell, 60.0);
    }
}
