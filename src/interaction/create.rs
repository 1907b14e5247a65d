// Create gesture
//
// The press position snaps to the nearest grid boundary and immediately shows a
// one-cell interval. Moving the pointer moves the far edge, re-snapped on every move.

use super::{Effect, InteractionContext};
use crate::models::grid::GridUnit;
use crate::models::interval::{round_grid_amount, Interval, IntervalId, IntervalMetadata};
use crate::utils::date::Timestamp;

/// Context for an active create gesture
#[derive(Debug, Clone, PartialEq)]
pub struct CreateContext {
    /// Boundary nearest the press position
    pub anchor: Timestamp,
    pub grid_unit: GridUnit,
    /// Cells per grid step; the default size of a new interval
    pub grid_value: u32,
    pub layer_id: Option<String>,
    pub pressed_at: i64,
    /// Current provisional span
    pub start_time: Timestamp,
    pub grid_amount: u32,
}

impl CreateContext {
    pub fn begin(
        x: f64,
        layer_id: Option<String>,
        pressed_at: i64,
        ctx: &InteractionContext,
    ) -> Self {
        let grid = ctx.geometry.grid();
        let anchor = ctx
            .snapper()
            .nearest_boundary(ctx.geometry.pixels_to_time(x));

        Self {
            anchor,
            grid_unit: grid.unit,
            grid_value: grid.value,
            layer_id,
            pressed_at,
            start_time: anchor,
            grid_amount: grid.value,
        }
    }

    /// Recompute the span for pointer position `x`.
    pub fn update(&mut self, x: f64, ctx: &InteractionContext) {
        let calendar = ctx.calendar();
        let far = ctx
            .snapper()
            .nearest_boundary(ctx.geometry.pixels_to_time(x));

        let (start_time, grid_amount) = if far > self.anchor {
            let cells = calendar.difference(self.anchor, far, self.grid_unit);
            (self.anchor, round_grid_amount(cells))
        } else if far < self.anchor {
            let cells = calendar.difference(far, self.anchor, self.grid_unit);
            (far, round_grid_amount(cells))
        } else {
            (self.anchor, self.grid_value)
        };

        self.start_time = start_time;
        self.grid_amount = grid_amount;
    }

    /// The interval the gesture would create.
    pub fn candidate(&self) -> Interval {
        Interval {
            id: IntervalId::new(),
            start_time: self.start_time,
            grid_unit: self.grid_unit,
            grid_amount: self.grid_amount,
            metadata: IntervalMetadata::default(),
            layer_id: self.layer_id.clone(),
        }
    }

    pub fn finish(&self, ctx: &InteractionContext) -> Vec<Effect> {
        let candidate = self.candidate();
        let calendar = ctx.calendar();

        if candidate.end_time(calendar) <= candidate.start_time {
            return vec![Effect::Rejected("Interval has no span".to_string())];
        }

        if ctx.settings.prevent_overlap && ctx.store.overlaps_on_layer(&candidate, &[]) {
            return vec![Effect::Rejected(format!(
                "Cannot create interval at {}: it overlaps an existing interval",
                calendar.format(candidate.start_time)
            ))];
        }

        vec![Effect::Create {
            start_time: candidate.start_time,
            grid_unit: candidate.grid_unit,
            grid_amount: candidate.grid_amount,
            layer_id: candidate.layer_id,
        }]
    }
}
