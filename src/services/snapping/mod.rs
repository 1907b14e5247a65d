// Snapping
//
// Grid cells of `value` units are anchored to a fixed calendar origin (see
// `Calendar::cell_index`), so snapping is stable regardless of viewport position.

use crate::models::grid::GridSettings;
use crate::utils::date::{Calendar, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapper {
    calendar: Calendar,
    grid: GridSettings,
}

impl Snapper {
    pub fn new(calendar: Calendar, grid: GridSettings) -> Self {
        Self { calendar, grid }
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    fn step(&self) -> i64 {
        i64::from(self.grid.value.max(1))
    }

    fn aligned_index(&self, t: Timestamp) -> i64 {
        let index = self.calendar.cell_index(t, self.grid.unit);
        index.div_euclid(self.step()) * self.step()
    }

    /// Start of the grid cell enclosing `t` (floor snap).
    pub fn snap(&self, t: Timestamp) -> Timestamp {
        self.calendar
            .cell_start(self.aligned_index(t), self.grid.unit)
    }

    /// Start and end of the grid cell enclosing `t`.
    pub fn cell_bounds(&self, t: Timestamp) -> (Timestamp, Timestamp) {
        let index = self.aligned_index(t);
        (
            self.calendar.cell_start(index, self.grid.unit),
            self.calendar.cell_start(index + self.step(), self.grid.unit),
        )
    }

    /// Whichever of the enclosing cell's start or the next cell's start is closer
    /// to `t`. Ties go to the earlier boundary.
    pub fn nearest_boundary(&self, t: Timestamp) -> Timestamp {
        let (start, next) = self.cell_bounds(t);
        if t - start <= next - t {
            start
        } else {
            next
        }
    }

    pub fn is_aligned(&self, t: Timestamp) -> bool {
        self.snap(t) == t
    }
}
