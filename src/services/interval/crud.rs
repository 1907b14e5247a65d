use super::IntervalStore;
use crate::error::{EditorError, EditorResult};
use crate::models::grid::GridUnit;
use crate::models::interval::{Interval, IntervalId, IntervalMetadata, IntervalPatch};
use crate::utils::date::Timestamp;

impl IntervalStore {
    /// Create a new interval and return its id.
    pub fn create_interval(
        &mut self,
        start_time: Timestamp,
        grid_unit: GridUnit,
        grid_amount: u32,
        metadata: Option<IntervalMetadata>,
    ) -> EditorResult<IntervalId> {
        let mut interval = Interval::new(start_time, grid_unit, grid_amount)
            .map_err(EditorError::InvalidInterval)?;
        if let Some(metadata) = metadata {
            interval.metadata = metadata;
        }
        self.insert(interval)
    }

    /// Insert a fully formed interval, keeping its id.
    pub fn insert(&mut self, interval: Interval) -> EditorResult<IntervalId> {
        self.validate_span(&interval)?;

        if self.contains(&interval.id) {
            return Err(EditorError::DuplicateInterval(interval.id));
        }

        let id = interval.id;
        log::debug!(
            "Created interval {} at {} ({} {})",
            id,
            self.calendar.format(interval.start_time),
            interval.grid_amount,
            interval.grid_unit
        );
        self.intervals.push(interval);
        Ok(id)
    }

    /// Shape checks plus both edges inside the supported calendar range.
    pub fn validate_span(&self, interval: &Interval) -> EditorResult<()> {
        interval.validate().map_err(EditorError::InvalidInterval)?;
        self.calendar
            .checked_span_end(interval.start_time, interval.grid_unit, interval.grid_amount)
            .map_err(EditorError::InvalidInterval)?;
        Ok(())
    }

    pub fn get(&self, id: &IntervalId) -> Option<&Interval> {
        self.intervals.iter().find(|interval| &interval.id == id)
    }

    pub fn contains(&self, id: &IntervalId) -> bool {
        self.get(id).is_some()
    }

    /// All intervals in insertion order.
    pub fn all(&self) -> &[Interval] {
        &self.intervals
    }

    /// Apply a partial update. Unknown ids and patches producing an invalid
    /// interval are rejected without touching the stored value.
    pub fn update_interval(&mut self, id: &IntervalId, patch: &IntervalPatch) -> EditorResult<()> {
        let slot = self
            .intervals
            .iter_mut()
            .find(|interval| &interval.id == id)
            .ok_or(EditorError::UnknownInterval(*id))?;

        let mut updated = slot.clone();
        updated.apply(patch);
        updated.validate().map_err(EditorError::InvalidInterval)?;
        self.calendar
            .checked_span_end(updated.start_time, updated.grid_unit, updated.grid_amount)
            .map_err(EditorError::InvalidInterval)?;
        *slot = updated;
        Ok(())
    }

    pub fn delete_interval(&mut self, id: &IntervalId) -> EditorResult<Interval> {
        let index = self
            .intervals
            .iter()
            .position(|interval| &interval.id == id)
            .ok_or(EditorError::UnknownInterval(*id))?;
        Ok(self.intervals.remove(index))
    }

    /// Replace the whole collection, e.g. after an import.
    pub fn replace_all(&mut self, intervals: Vec<Interval>) {
        self.intervals = intervals;
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}
