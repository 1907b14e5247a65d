//! Grid geometry: mapping between calendar time and pixel space.
//!
//! The pixel scale is a single constant for the whole viewport. For month and year
//! grids it is derived from the length of one cell starting at a reference instant,
//! so grid lines are drawn evenly even though real months differ in length.

use crate::error::{EditorError, EditorResult};
use crate::models::grid::{GridLine, GridSettings, GridUnit};
use crate::models::settings::EditorSettings;
use crate::utils::date::{Calendar, Timestamp};

/// Visible time range and the pixel width available to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub min: Timestamp,
    pub max: Timestamp,
    pub width_px: f64,
}

impl ViewportBounds {
    pub fn new(min: Timestamp, max: Timestamp, width_px: f64) -> Self {
        Self { min, max, width_px }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    calendar: Calendar,
    grid: GridSettings,
    bounds: ViewportBounds,
    base_pixels_per_cell: f64,
    pixels_per_ms: f64,
    max_lines: usize,
}

impl GridGeometry {
    pub fn new(
        calendar: Calendar,
        grid: GridSettings,
        bounds: ViewportBounds,
        base_pixels_per_cell: f64,
        reference: Timestamp,
        max_lines: usize,
    ) -> EditorResult<Self> {
        grid.validate().map_err(EditorError::InvalidGridSettings)?;

        if bounds.min > bounds.max {
            return Err(EditorError::InvalidViewport {
                min: bounds.min,
                max: bounds.max,
            });
        }

        if !base_pixels_per_cell.is_finite() || base_pixels_per_cell <= 0.0 {
            return Err(EditorError::InvalidSettings(
                "Base pixels per cell must be a positive number".to_string(),
            ));
        }

        let cell_ms = Self::ms_per_cell(&calendar, grid, reference);
        if cell_ms <= 0 {
            return Err(EditorError::InvalidGridSettings(format!(
                "A {} cell has no duration at the reference instant",
                grid
            )));
        }

        Ok(Self {
            calendar,
            grid,
            bounds,
            base_pixels_per_cell,
            pixels_per_ms: base_pixels_per_cell / cell_ms as f64,
            max_lines,
        })
    }

    /// Geometry for the configured grid, resolving the reference instant from settings.
    pub fn from_settings(
        settings: &EditorSettings,
        calendar: Calendar,
        bounds: ViewportBounds,
    ) -> EditorResult<Self> {
        Self::new(
            calendar,
            settings.grid,
            bounds,
            settings.base_pixels_per_cell,
            settings.resolve_reference_instant(),
            settings.max_grid_lines,
        )
    }

    /// Length of one grid cell starting at `reference`.
    pub fn ms_per_cell(calendar: &Calendar, grid: GridSettings, reference: Timestamp) -> i64 {
        calendar.advance(reference, grid.unit, i64::from(grid.value)) - reference
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn bounds(&self) -> ViewportBounds {
        self.bounds
    }

    pub fn pixels_per_ms(&self) -> f64 {
        self.pixels_per_ms
    }

    pub fn cell_width_px(&self) -> f64 {
        self.base_pixels_per_cell
    }

    pub fn time_to_pixels(&self, t: Timestamp) -> f64 {
        (t - self.bounds.min) as f64 * self.pixels_per_ms
    }

    pub fn pixels_to_time(&self, x: f64) -> Timestamp {
        self.bounds.min + (x / self.pixels_per_ms).round() as i64
    }

    /// Pixel distance expressed as a time distance.
    pub fn delta_px_to_ms(&self, dx: f64) -> i64 {
        (dx / self.pixels_per_ms).round() as i64
    }

    /// Horizontal pixel extent of a half-open time span.
    pub fn span_to_pixels(&self, start: Timestamp, end: Timestamp) -> (f64, f64) {
        (self.time_to_pixels(start), self.time_to_pixels(end))
    }

    /// Pointer x clamped to the drawable width.
    pub fn clamp_x(&self, x: f64) -> f64 {
        if self.bounds.width_px > 0.0 {
            x.clamp(0.0, self.bounds.width_px)
        } else {
            x
        }
    }

    /// Width in pixels of the whole visible range.
    pub fn content_width_px(&self) -> f64 {
        self.time_to_pixels(self.bounds.max)
    }

    /// Grid lines from the first cell boundary at or before `min` through `max`.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let GridSettings { unit, value } = self.grid;
        let step = i64::from(value);
        let mut lines = Vec::new();
        let mut current = self.first_boundary();

        while current <= self.bounds.max {
            if lines.len() >= self.max_lines {
                log::warn!(
                    "Grid line limit of {} reached for {} grid; truncating",
                    self.max_lines,
                    self.grid
                );
                break;
            }

            lines.push(GridLine {
                time: current,
                x: self.time_to_pixels(current),
                major: self.is_major(current),
            });

            let next = self.calendar.advance(current, unit, step);
            if next <= current {
                break;
            }
            current = next;
        }

        lines
    }

    fn first_boundary(&self) -> Timestamp {
        let GridSettings { unit, value } = self.grid;
        let index = self.calendar.cell_index(self.bounds.min, unit);
        let aligned = index.div_euclid(i64::from(value.max(1))) * i64::from(value.max(1));
        self.calendar.cell_start(aligned, unit)
    }

    fn is_major(&self, t: Timestamp) -> bool {
        match self.grid.unit {
            GridUnit::Day => self.calendar.is_month_start(t),
            GridUnit::Month => self.calendar.is_year_start(t),
            GridUnit::Year => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::MS_PER_DAY;

    fn cal() -> Calendar {
        Calendar::default()
    }

    fn ts(year: i32, month: u32, day: u32) -> Timestamp {
        cal().ymd(year, month, day).unwrap()
    }

    fn geometry(unit: GridUnit, value: u32, min: Timestamp, max: Timestamp) -> GridGeometry {
        GridGeometry::new(
            cal(),
            GridSettings::new(unit, value).unwrap(),
            ViewportBounds::new(min, max, 1200.0),
            60.0,
            ts(2025, 1, 1),
            2000,
        )
        .unwrap()
    }

    #[test]
    fn test_day_scale() {
        let g = geometry(GridUnit::Day, 1, ts(2025, 1, 1), ts(2025, 2, 1));
        assert_eq!(g.time_to_pixels(ts(2025, 1, 3)), 120.0);
        assert_eq!(g.pixels_to_time(60.0), ts(2025, 1, 2));
        assert_eq!(g.delta_px_to_ms(30.0), MS_PER_DAY / 2);
    }

    #[test]
    fn test_month_scale_uses_reference_instant() {
        // January is 31 days long
        let g = geometry(GridUnit::Month, 1, ts(2025, 1, 1), ts(2026, 1, 1));
        let expected = 60.0 / (31 * MS_PER_DAY) as f64;
        assert!((g.pixels_per_ms() - expected).abs() < 1e-18);
    }

    #[test]
    fn test_round_trip_within_a_millisecond() {
        let g = geometry(GridUnit::Month, 1, ts(2020, 1, 1), ts(2030, 1, 1));
        for t in [ts(2020, 1, 1), ts(2023, 7, 14) + 123_457, ts(2029, 12, 31) + 1] {
            let back = g.pixels_to_time(g.time_to_pixels(t));
            assert!((back - t).abs() <= 1, "{} -> {}", t, back);
        }
    }

    #[test]
    fn test_day_grid_majors_on_month_start() {
        let g = geometry(GridUnit::Day, 1, ts(2025, 1, 30), ts(2025, 2, 2));
        let lines = g.grid_lines();
        let times: Vec<_> = lines.iter().map(|l| l.time).collect();
        assert_eq!(
            times,
            vec![ts(2025, 1, 30), ts(2025, 1, 31), ts(2025, 2, 1), ts(2025, 2, 2)]
        );
        let majors: Vec<_> = lines.iter().map(|l| l.major).collect();
        assert_eq!(majors, vec![false, false, true, false]);
    }

    #[test]
    fn test_month_grid_starts_at_enclosing_month() {
        let g = geometry(GridUnit::Month, 1, ts(2024, 11, 20), ts(2025, 2, 10));
        let lines = g.grid_lines();
        assert_eq!(lines[0].time, ts(2024, 11, 1));
        assert!(lines[0].x < 0.0);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].major, "January is a year start");
        assert!(!lines[1].major);
    }

    #[test]
    fn test_year_grid_lines_are_major() {
        let g = geometry(GridUnit::Year, 2, ts(2021, 6, 1), ts(2030, 1, 1));
        let lines = g.grid_lines();
        assert!(lines.iter().all(|l| l.major));
        assert_eq!(lines[0].time, ts(2020, 1, 1));
        assert_eq!(lines[1].time, ts(2022, 1, 1));
    }

    #[test]
    fn test_grid_line_ceiling() {
        let g = GridGeometry::new(
            cal(),
            GridSettings::new(GridUnit::Day, 1).unwrap(),
            ViewportBounds::new(ts(2000, 1, 1), ts(2100, 1, 1), 800.0),
            10.0,
            ts(2000, 1, 1),
            50,
        )
        .unwrap();
        assert_eq!(g.grid_lines().len(), 50);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let grid = GridSettings {
            unit: GridUnit::Day,
            value: 0,
        };
        let bounds = ViewportBounds::new(0, MS_PER_DAY, 100.0);
        assert!(matches!(
            GridGeometry::new(cal(), grid, bounds, 60.0, 0, 100),
            Err(EditorError::InvalidGridSettings(_))
        ));

        let inverted = ViewportBounds::new(MS_PER_DAY, 0, 100.0);
        assert!(matches!(
            GridGeometry::new(cal(), GridSettings::default(), inverted, 60.0, 0, 100),
            Err(EditorError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn test_clamp_x() {
        let g = geometry(GridUnit::Day, 1, ts(2025, 1, 1), ts(2025, 2, 1));
        assert_eq!(g.clamp_x(-5.0), 0.0);
        assert_eq!(g.clamp_x(5000.0), 1200.0);
        assert_eq!(g.clamp_x(42.0), 42.0);
    }
}
