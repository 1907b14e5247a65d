// Interval drag gesture
//
// Positions are always recomputed from the press anchor, never accumulated, so a
// coalesced or repeated move event cannot drift from the pointer.

use super::{Effect, InteractionContext};
use crate::models::interval::{Interval, IntervalId, IntervalPatch};
use crate::utils::date::Timestamp;

/// One interval moved by a drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragMember {
    pub id: IntervalId,
    pub original_start: Timestamp,
    /// Last position that passed the overlap check
    pub current_start: Timestamp,
}

/// Context for an active drag. The first member is the interval under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub press_x: f64,
    pub pressed_at: i64,
    /// Set once the pointer has travelled past the drag threshold
    pub committed: bool,
    pub members: Vec<DragMember>,
}

impl DragContext {
    /// Start dragging `id`. When it belongs to a multi-item selection every
    /// selected interval comes along.
    pub fn from_interval(
        id: IntervalId,
        x: f64,
        pressed_at: i64,
        ctx: &InteractionContext,
    ) -> Option<Self> {
        let primary = ctx.store.get(&id)?;
        let mut members = vec![DragMember {
            id,
            original_start: primary.start_time,
            current_start: primary.start_time,
        }];

        if ctx.selection.contains(&id) && ctx.selection.len() > 1 {
            members.extend(
                ctx.selection
                    .iter()
                    .filter(|other| **other != id)
                    .filter_map(|other| ctx.store.get(other))
                    .map(|interval| DragMember {
                        id: interval.id,
                        original_start: interval.start_time,
                        current_start: interval.start_time,
                    }),
            );
        }

        Some(Self {
            press_x: x,
            pressed_at,
            committed: false,
            members,
        })
    }

    pub fn primary(&self) -> IntervalId {
        self.members[0].id
    }

    pub fn member_ids(&self) -> Vec<IntervalId> {
        self.members.iter().map(|member| member.id).collect()
    }

    pub fn update(&mut self, x: f64, ctx: &InteractionContext) {
        let dx = x - self.press_x;
        if !self.committed {
            if dx.abs() < ctx.drag_threshold_px() {
                return;
            }
            self.committed = true;
            log::debug!("Drag of {} committed after {:.1}px", self.primary(), dx);
        }

        let tentative = self.tentative_starts(dx, ctx);
        if ctx.settings.prevent_overlap && self.collides(&tentative, ctx) {
            log::debug!("Drag position suppressed: overlap");
            return;
        }

        for (member, start) in self.members.iter_mut().zip(tentative) {
            member.current_start = start;
        }
    }

    /// The interval under the pointer snaps to the grid; the rest shift by the same
    /// number of grid cells so mixed units move consistently.
    fn tentative_starts(&self, dx: f64, ctx: &InteractionContext) -> Vec<Timestamp> {
        let calendar = ctx.calendar();
        let unit = ctx.geometry.grid().unit;
        let primary_original = self.members[0].original_start;
        let primary_start = ctx
            .snapper()
            .snap(primary_original + ctx.geometry.delta_px_to_ms(dx));
        let cells = calendar
            .difference(primary_original, primary_start, unit)
            .round() as i64;

        let mut starts = Vec::with_capacity(self.members.len());
        starts.push(primary_start);
        starts.extend(
            self.members[1..]
                .iter()
                .map(|member| calendar.advance(member.original_start, unit, cells)),
        );
        starts
    }

    fn collides(&self, starts: &[Timestamp], ctx: &InteractionContext) -> bool {
        let ids = self.member_ids();
        self.members
            .iter()
            .zip(starts)
            .filter_map(|(member, start)| {
                ctx.store
                    .get(&member.id)
                    .map(|interval| interval.moved_to(*start))
            })
            .any(|moved| ctx.store.overlaps_on_layer(&moved, &ids))
    }

    /// Intervals at their current drag positions.
    pub fn moved_intervals(&self, ctx: &InteractionContext) -> Vec<Interval> {
        self.members
            .iter()
            .filter_map(|member| {
                ctx.store
                    .get(&member.id)
                    .map(|interval| interval.moved_to(member.current_start))
            })
            .collect()
    }

    pub fn finish(&self) -> Vec<Effect> {
        self.members
            .iter()
            .filter(|member| member.current_start != member.original_start)
            .map(|member| Effect::Update {
                id: member.id,
                patch: IntervalPatch::start(member.current_start),
            })
            .collect()
    }
}
