use super::IntervalStore;
use crate::models::grid::GridUnit;
use crate::models::interval::{Interval, IntervalId};
use crate::utils::date::Timestamp;

impl IntervalStore {
    /// Whether a span of `grid_amount` `grid_unit`s from `start_time` overlaps any
    /// stored interval other than `exclude`, on any layer.
    pub fn query_overlaps(
        &self,
        start_time: Timestamp,
        grid_unit: GridUnit,
        grid_amount: u32,
        exclude: Option<&IntervalId>,
    ) -> bool {
        let end = self
            .calendar
            .advance(start_time, grid_unit, i64::from(grid_amount));
        self.intervals
            .iter()
            .filter(|interval| Some(&interval.id) != exclude)
            .any(|interval| interval.overlaps_range(start_time, end, &self.calendar))
    }

    /// Whether `candidate` overlaps a stored interval on its own layer. Ids in
    /// `ignore` (and the candidate's own id) are skipped.
    pub fn overlaps_on_layer(&self, candidate: &Interval, ignore: &[IntervalId]) -> bool {
        let (start, end) = candidate.span(&self.calendar);
        self.intervals
            .iter()
            .filter(|interval| interval.id != candidate.id && !ignore.contains(&interval.id))
            .filter(|interval| interval.on_layer(candidate.layer_id.as_deref()))
            .any(|interval| interval.overlaps_range(start, end, &self.calendar))
    }

    /// Intervals intersecting `[min, max)`, ordered by start time.
    pub fn intervals_in_range(&self, min: Timestamp, max: Timestamp) -> Vec<&Interval> {
        let mut visible: Vec<&Interval> = self
            .intervals
            .iter()
            .filter(|interval| interval.overlaps_range(min, max, &self.calendar))
            .collect();
        visible.sort_by_key(|interval| (interval.start_time, interval.id));
        visible
    }

    /// Every interval, ordered by start time then id.
    pub fn list(&self) -> Vec<&Interval> {
        let mut all: Vec<&Interval> = self.intervals.iter().collect();
        all.sort_by_key(|interval| (interval.start_time, interval.id));
        all
    }

    /// Ids of every stored interval.
    pub fn ids(&self) -> Vec<IntervalId> {
        self.intervals.iter().map(|interval| interval.id).collect()
    }

    /// Resolve ids to intervals, skipping unknown ids.
    pub fn get_many(&self, ids: &[IntervalId]) -> Vec<&Interval> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn min_start(&self, ids: &[IntervalId]) -> Option<Timestamp> {
        self.get_many(ids)
            .into_iter()
            .map(|interval| interval.start_time)
            .min()
    }

    pub fn max_end(&self, ids: &[IntervalId]) -> Option<Timestamp> {
        self.get_many(ids)
            .into_iter()
            .map(|interval| interval.end_time(&self.calendar))
            .max()
    }
}
