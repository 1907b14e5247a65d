//! Batch transforms over the selection: copy, paste, duplicate, scale and delete.
//!
//! The engine only reads the interval collection. Every operation produces a
//! [`BatchPlan`] of individual create/update/delete commands which the caller runs
//! through the command queue. The only state kept between operations is the
//! [`Clipboard`].

use crate::error::{EditorError, EditorResult};
use crate::models::grid::GridUnit;
use crate::models::interval::{round_grid_amount, Interval, IntervalId, IntervalPatch};
use crate::models::selection::Selection;
use crate::services::commands::{
    Command, CreateIntervalCommand, DeleteIntervalCommand, UpdateIntervalCommand,
};
use crate::services::interval::IntervalStore;
use crate::utils::date::{Calendar, Timestamp};

/// Cloned intervals waiting to be pasted. Ids are minted when the clones are taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    entries: Vec<Interval>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entries: Vec<Interval>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[Interval] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Commands produced by one batch operation.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub commands: Vec<Box<dyn Command>>,
    /// Ids of intervals the plan creates
    pub created: Vec<IntervalId>,
}

impl BatchPlan {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// How a group of intervals is shifted as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GroupShift {
    Calendar { unit: GridUnit, amount: i64 },
    Millis(i64),
}

impl GroupShift {
    /// Coarsest calendar unit that moves `from` exactly onto `to`, else raw milliseconds.
    fn between(calendar: &Calendar, from: Timestamp, to: Timestamp) -> Self {
        for unit in [GridUnit::Year, GridUnit::Month, GridUnit::Day] {
            let amount = calendar.difference(from, to, unit).round() as i64;
            if amount != 0 && calendar.advance(from, unit, amount) == to {
                return GroupShift::Calendar { unit, amount };
            }
        }
        GroupShift::Millis(to - from)
    }

    fn apply(&self, calendar: &Calendar, t: Timestamp) -> Timestamp {
        match *self {
            GroupShift::Calendar { unit, amount } => calendar.advance(t, unit, amount),
            GroupShift::Millis(ms) => t + ms,
        }
    }
}

pub struct BatchEngine<'a> {
    store: &'a IntervalStore,
}

impl<'a> BatchEngine<'a> {
    pub fn new(store: &'a IntervalStore) -> Self {
        Self { store }
    }

    fn calendar(&self) -> &Calendar {
        self.store.calendar()
    }

    /// Selected intervals ordered by start time.
    fn selected(&self, selection: &Selection) -> EditorResult<Vec<&'a Interval>> {
        let store: &'a IntervalStore = self.store;
        let mut intervals = store.get_many(&selection.to_vec());
        if intervals.is_empty() {
            return Err(EditorError::EmptySelection);
        }
        intervals.sort_by_key(|interval| (interval.start_time, interval.id));
        Ok(intervals)
    }

    /// Clone every selected interval with a fresh id.
    pub fn copy(&self, selection: &Selection) -> EditorResult<Vec<Interval>> {
        Ok(self
            .selected(selection)?
            .into_iter()
            .map(Interval::clone_with_new_id)
            .collect())
    }

    /// Place the group immediately after its latest end, keeping relative spacing.
    fn place_after(&self, group: &[&Interval]) -> Vec<Interval> {
        let calendar = self.calendar();
        let anchor = group
            .iter()
            .map(|interval| interval.end_time(calendar))
            .max();
        let min_start = group.iter().map(|interval| interval.start_time).min();

        let (Some(anchor), Some(min_start)) = (anchor, min_start) else {
            return Vec::new();
        };

        let shift = GroupShift::between(calendar, min_start, anchor);
        log::debug!("Placing {} interval(s) with shift {:?}", group.len(), shift);

        group
            .iter()
            .map(|interval| interval.moved_to(shift.apply(calendar, interval.start_time)))
            .collect()
    }

    fn creation_plan(placed: Vec<Interval>) -> BatchPlan {
        let mut plan = BatchPlan::default();
        for interval in placed {
            plan.created.push(interval.id);
            plan.commands
                .push(Box::new(CreateIntervalCommand::new(interval)));
        }
        plan
    }

    /// Create the clipboard clones after the latest clipboard end.
    pub fn paste(&self, clipboard: &Clipboard) -> EditorResult<BatchPlan> {
        if clipboard.is_empty() {
            return Err(EditorError::EmptyClipboard);
        }

        let group: Vec<&Interval> = clipboard.entries().iter().collect();
        let mut placed = self.place_after(&group);
        for interval in placed.iter_mut() {
            if self.store.contains(&interval.id) {
                interval.id = IntervalId::new();
            }
        }
        Ok(Self::creation_plan(placed))
    }

    /// Copies of the selection placed after its latest end.
    pub fn duplicate(&self, selection: &Selection) -> EditorResult<BatchPlan> {
        let group = self.selected(selection)?;
        let placed = self
            .place_after(&group)
            .into_iter()
            .map(|interval| interval.clone_with_new_id())
            .collect();
        Ok(Self::creation_plan(placed))
    }

    /// Scale position and span of every selected interval around the earliest start.
    ///
    /// Each interval's offset from the anchor is measured in its own grid unit, so
    /// doubling `[Mar 1, Apr 1)` with anchor Jan 1 yields `[May 1, Jul 1)`.
    pub fn scale(&self, selection: &Selection, factor: f64) -> EditorResult<BatchPlan> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EditorError::InvalidScaleFactor(factor));
        }

        let group = self.selected(selection)?;
        let mut plan = BatchPlan::default();
        if factor == 1.0 {
            return Ok(plan);
        }

        let calendar = self.calendar();
        let Some(anchor) = group.iter().map(|interval| interval.start_time).min() else {
            return Ok(plan);
        };

        for interval in group {
            let unit = interval.grid_unit;
            let offset = calendar.difference(anchor, interval.start_time, unit);
            let start_time = calendar.advance_fractional(anchor, unit, offset * factor);
            let grid_amount = round_grid_amount(f64::from(interval.grid_amount) * factor);

            if start_time == interval.start_time && grid_amount == interval.grid_amount {
                continue;
            }

            plan.commands.push(Box::new(UpdateIntervalCommand::new(
                interval.id,
                IntervalPatch::start_and_amount(start_time, grid_amount),
            )));
        }

        Ok(plan)
    }

    /// Delete every selected interval.
    pub fn delete(&self, selection: &Selection) -> EditorResult<BatchPlan> {
        let group = self.selected(selection)?;
        let mut plan = BatchPlan::default();
        for interval in group {
            plan.commands
                .push(Box::new(DeleteIntervalCommand::new(interval.id)));
        }
        Ok(plan)
    }
}
