// Test fixtures - reusable test data
// Provides consistent dates, intervals and editors across test files
#![allow(dead_code)]

use interval_grid::models::grid::GridUnit;
use interval_grid::models::interval::Interval;
use interval_grid::models::settings::EditorSettings;
use interval_grid::services::geometry::{GridGeometry, ViewportBounds};
use interval_grid::utils::date::{Calendar, Timestamp};
use interval_grid::IntervalEditor;

/// Sample dates for testing, as UTC timestamps
pub mod dates {
    use super::*;

    pub fn ymd(year: i32, month: u32, day: u32) -> Timestamp {
        Calendar::default().ymd(year, month, day).unwrap()
    }

    /// Returns Jan 1, 2025 at midnight
    pub fn jan_1_2025() -> Timestamp {
        ymd(2025, 1, 1)
    }

    /// Returns Mar 1, 2025 at midnight
    pub fn mar_1_2025() -> Timestamp {
        ymd(2025, 3, 1)
    }

    /// Returns Jun 1, 2025 at midnight
    pub fn jun_1_2025() -> Timestamp {
        ymd(2025, 6, 1)
    }

    /// Returns Jan 31, 2025 (month-end clamping)
    pub fn jan_31_2025() -> Timestamp {
        ymd(2025, 1, 31)
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> Timestamp {
        ymd(2024, 2, 29)
    }
}

/// Sample intervals for testing
pub mod intervals {
    use super::*;

    pub fn months(start: Timestamp, amount: u32) -> Interval {
        Interval::new(start, GridUnit::Month, amount).unwrap()
    }

    pub fn days(start: Timestamp, amount: u32) -> Interval {
        Interval::new(start, GridUnit::Day, amount).unwrap()
    }

    /// A labelled quarter on the "planning" layer
    pub fn planning_quarter() -> Interval {
        Interval::builder()
            .start(dates::jan_1_2025())
            .unit(GridUnit::Month)
            .amount(3)
            .label("Q1 planning")
            .color("#3366FF")
            .tag("planning")
            .layer("planning")
            .build()
            .unwrap()
    }
}

/// Settings with a pinned scale reference so pixel values are reproducible
pub fn settings() -> EditorSettings {
    EditorSettings {
        reference_instant: Some(dates::jan_1_2025()),
        ..EditorSettings::default()
    }
}

pub fn editor() -> IntervalEditor {
    IntervalEditor::new(settings()).unwrap()
}

/// Geometry covering 2025 for `editor`
pub fn year_view(editor: &IntervalEditor) -> GridGeometry {
    editor
        .geometry(ViewportBounds::new(
            dates::jan_1_2025(),
            dates::ymd(2026, 1, 1),
            1200.0,
        ))
        .unwrap()
}
