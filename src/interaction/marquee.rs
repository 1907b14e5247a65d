// Marquee selection gesture

use super::{Effect, InteractionContext};
use crate::models::interval::IntervalId;
use crate::utils::date::Timestamp;

/// Context for an active marquee selection
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeContext {
    pub press_x: f64,
    pub current_x: f64,
    pub pressed_at: i64,
}

impl MarqueeContext {
    pub fn begin(x: f64, pressed_at: i64) -> Self {
        Self {
            press_x: x,
            current_x: x,
            pressed_at,
        }
    }

    pub fn update(&mut self, x: f64) {
        self.current_x = x;
    }

    pub fn width_px(&self) -> f64 {
        (self.current_x - self.press_x).abs()
    }

    /// Half-open time range covered by the marquee.
    pub fn range(&self, ctx: &InteractionContext) -> (Timestamp, Timestamp) {
        let left = self.press_x.min(self.current_x);
        let right = self.press_x.max(self.current_x);
        (
            ctx.geometry.pixels_to_time(left),
            ctx.geometry.pixels_to_time(right),
        )
    }

    /// Replace the selection with every interval intersecting the marquee.
    pub fn finish(&self, ctx: &InteractionContext) -> Vec<Effect> {
        let (min, max) = self.range(ctx);
        let ids: Vec<IntervalId> = if min < max {
            ctx.store
                .intervals_in_range(min, max)
                .into_iter()
                .map(|interval| interval.id)
                .collect()
        } else {
            Vec::new()
        };
        vec![Effect::SetSelection(ids)]
    }
}
