// Interval Resize Gesture
//
// Dragging an edge handle snaps that edge to the nearest grid boundary.
// - Start edge: moves the start and recomputes the amount so the end stays put
// - End edge: changes the amount only

use super::{Effect, InteractionContext};
use crate::models::grid::GridUnit;
use crate::models::interval::{round_grid_amount, Interval, IntervalId, IntervalPatch};
use crate::utils::date::Timestamp;

/// Which edge of the interval is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// Context for an active resize operation
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeContext {
    pub interval_id: IntervalId,
    pub edge: ResizeEdge,
    pub press_x: f64,
    pub original_start: Timestamp,
    pub original_end: Timestamp,
    pub grid_unit: GridUnit,
    pub original_amount: u32,
    /// Set once the pointer has travelled past the drag threshold
    pub committed: bool,
    /// Last span that passed the overlap check
    pub start_time: Timestamp,
    pub grid_amount: u32,
}

impl ResizeContext {
    pub fn from_interval(
        id: IntervalId,
        edge: ResizeEdge,
        x: f64,
        ctx: &InteractionContext,
    ) -> Option<Self> {
        let interval = ctx.store.get(&id)?;
        Some(Self {
            interval_id: id,
            edge,
            press_x: x,
            original_start: interval.start_time,
            original_end: interval.end_time(ctx.calendar()),
            grid_unit: interval.grid_unit,
            original_amount: interval.grid_amount,
            committed: false,
            start_time: interval.start_time,
            grid_amount: interval.grid_amount,
        })
    }

    /// Span for a pointer displacement of `dx` pixels. Never inverts: the span
    /// is at least one unit of the interval's own grid unit.
    fn tentative(&self, dx: f64, ctx: &InteractionContext) -> (Timestamp, u32) {
        let calendar = ctx.calendar();
        let snapper = ctx.snapper();
        let dt = ctx.geometry.delta_px_to_ms(dx);

        match self.edge {
            ResizeEdge::Start => {
                let new_start = snapper.nearest_boundary(self.original_start + dt);
                let cells = calendar
                    .difference(new_start, self.original_end, self.grid_unit)
                    .round();
                if cells < 1.0 {
                    (calendar.advance(self.original_end, self.grid_unit, -1), 1)
                } else {
                    (new_start, round_grid_amount(cells))
                }
            }
            ResizeEdge::End => {
                let new_end = snapper.nearest_boundary(self.original_end + dt);
                let cells = calendar.difference(self.original_start, new_end, self.grid_unit);
                (self.original_start, round_grid_amount(cells))
            }
        }
    }

    pub fn update(&mut self, x: f64, ctx: &InteractionContext) {
        let dx = x - self.press_x;
        if !self.committed {
            if dx.abs() < ctx.drag_threshold_px() {
                return;
            }
            self.committed = true;
            log::debug!("Resize of {} committed after {:.1}px", self.interval_id, dx);
        }

        let (start_time, grid_amount) = self.tentative(dx, ctx);

        if ctx.settings.prevent_overlap {
            if let Some(resized) = self.resized_to(start_time, grid_amount, ctx) {
                if ctx.store.overlaps_on_layer(&resized, &[]) {
                    log::debug!("Resize of {} suppressed: overlap", self.interval_id);
                    return;
                }
            }
        }

        self.start_time = start_time;
        self.grid_amount = grid_amount;
    }

    fn resized_to(
        &self,
        start_time: Timestamp,
        grid_amount: u32,
        ctx: &InteractionContext,
    ) -> Option<Interval> {
        ctx.store.get(&self.interval_id).map(|interval| Interval {
            start_time,
            grid_amount,
            ..interval.clone()
        })
    }

    /// Interval at its current resize span.
    pub fn resized_interval(&self, ctx: &InteractionContext) -> Option<Interval> {
        self.resized_to(self.start_time, self.grid_amount, ctx)
    }

    pub fn finish(&self) -> Vec<Effect> {
        if self.start_time == self.original_start && self.grid_amount == self.original_amount {
            return Vec::new();
        }

        let patch = match self.edge {
            ResizeEdge::Start => IntervalPatch::start_and_amount(self.start_time, self.grid_amount),
            ResizeEdge::End => IntervalPatch::amount(self.grid_amount),
        };
        vec![Effect::Update {
            id: self.interval_id,
            patch,
        }]
    }
}
