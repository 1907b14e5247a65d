//! Pointer interaction state machine.
//!
//! `InteractionMachine::handle_event` turns pointer events into a new gesture state
//! plus a list of [`Effect`]s. The machine never touches the interval store; the
//! caller applies effects (normally through the command queue) so every transition
//! can be tested without a pointer device.
//!
//! ```text
//! Idle ──down on background──────────────▶ Selecting ──up──▶ Idle
//! Idle ──double down on background───────▶ Creating  ──up──▶ Idle
//! Idle ──down on interval body───────────▶ Dragging  ──up──▶ Idle
//! Idle ──down on edge handle─────────────▶ Resizing  ──up──▶ Idle
//! any  ──leave / cancel──────────────────▶ Idle
//! ```

mod create;
mod drag;
mod hit_test;
mod marquee;
mod resize;

pub use create::CreateContext;
pub use drag::{DragContext, DragMember};
pub use hit_test::{hit_test, HitTarget};
pub use marquee::MarqueeContext;
pub use resize::{ResizeContext, ResizeEdge};

use crate::models::grid::GridUnit;
use crate::models::interval::{Interval, IntervalId, IntervalPatch};
use crate::models::selection::Selection;
use crate::models::settings::EditorSettings;
use crate::services::geometry::GridGeometry;
use crate::services::interval::IntervalStore;
use crate::services::snapping::Snapper;
use crate::utils::date::{Calendar, Timestamp};

/// Pointer input, in viewport pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Press; `target` comes from [`hit_test`], `at_ms` is the event time
    Down { x: f64, target: HitTarget, at_ms: i64 },
    Move { x: f64 },
    Up { x: f64 },
    /// Pointer left the grid without releasing
    Leave,
    /// Explicit abort, e.g. escape
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    Creating,
    Selecting,
    Dragging,
    Resizing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Creating(CreateContext),
    Selecting(MarqueeContext),
    Dragging(DragContext),
    Resizing(ResizeContext),
}

impl InteractionState {
    pub fn kind(&self) -> GestureKind {
        match self {
            InteractionState::Idle => GestureKind::Idle,
            InteractionState::Creating(_) => GestureKind::Creating,
            InteractionState::Selecting(_) => GestureKind::Selecting,
            InteractionState::Dragging(_) => GestureKind::Dragging,
            InteractionState::Resizing(_) => GestureKind::Resizing,
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Create {
        start_time: Timestamp,
        grid_unit: GridUnit,
        grid_amount: u32,
        layer_id: Option<String>,
    },
    Update {
        id: IntervalId,
        patch: IntervalPatch,
    },
    /// Replace the selection
    SetSelection(Vec<IntervalId>),
    /// Interval activated twice within the double-activation window
    EditRequested(IntervalId),
    /// Gesture finished without committing
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GestureKind,
    pub effects: Vec<Effect>,
}

/// Read-only view of the editor a transition needs
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub store: &'a IntervalStore,
    pub geometry: &'a GridGeometry,
    pub selection: &'a Selection,
    pub settings: &'a EditorSettings,
}

impl<'a> InteractionContext<'a> {
    pub fn new(
        store: &'a IntervalStore,
        geometry: &'a GridGeometry,
        selection: &'a Selection,
        settings: &'a EditorSettings,
    ) -> Self {
        Self {
            store,
            geometry,
            selection,
            settings,
        }
    }

    pub fn calendar(&self) -> &Calendar {
        self.geometry.calendar()
    }

    pub fn snapper(&self) -> Snapper {
        Snapper::new(*self.geometry.calendar(), self.geometry.grid())
    }

    pub fn drag_threshold_px(&self) -> f64 {
        self.geometry.cell_width_px() * self.settings.drag_threshold_cells
    }
}

/// What was clicked last, for double-activation detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivationTarget {
    Background,
    Interval(IntervalId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Activation {
    target: ActivationTarget,
    at_ms: i64,
}

/// In-progress gesture shown while the pointer is down
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub kind: GestureKind,
    pub intervals: Vec<Interval>,
    /// Marquee time range while selecting
    pub marquee: Option<(Timestamp, Timestamp)>,
}

#[derive(Debug, Default)]
pub struct InteractionMachine {
    state: InteractionState,
    last_activation: Option<Activation>,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn kind(&self) -> GestureKind {
        self.state.kind()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Discard the active gesture without emitting anything.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            log::debug!("{:?} gesture cancelled", self.kind());
        }
        self.state = InteractionState::Idle;
    }

    pub fn handle_event(&mut self, event: PointerEvent, ctx: &InteractionContext) -> Transition {
        let effects = match event {
            PointerEvent::Down { x, target, at_ms } => self.pointer_down(x, target, at_ms, ctx),
            PointerEvent::Move { x } => {
                self.pointer_move(x, ctx);
                Vec::new()
            }
            PointerEvent::Up { x } => {
                self.pointer_move(x, ctx);
                self.pointer_up(ctx)
            }
            PointerEvent::Leave | PointerEvent::Cancel => {
                self.cancel();
                Vec::new()
            }
        };

        Transition {
            state: self.kind(),
            effects,
        }
    }

    pub fn preview(&self, ctx: &InteractionContext) -> Option<Preview> {
        let kind = self.kind();
        let (intervals, marquee) = match &self.state {
            InteractionState::Idle => return None,
            InteractionState::Creating(create) => (vec![create.candidate()], None),
            InteractionState::Selecting(marquee) => (Vec::new(), Some(marquee.range(ctx))),
            InteractionState::Dragging(drag) => (drag.moved_intervals(ctx), None),
            InteractionState::Resizing(resize) => {
                (resize.resized_interval(ctx).into_iter().collect(), None)
            }
        };

        Some(Preview {
            kind,
            intervals,
            marquee,
        })
    }

    fn is_double_activation(&self, target: ActivationTarget, at_ms: i64, window_ms: i64) -> bool {
        self.last_activation.map_or(false, |last| {
            let elapsed = at_ms - last.at_ms;
            last.target == target && (0..=window_ms).contains(&elapsed)
        })
    }

    fn pointer_down(
        &mut self,
        x: f64,
        target: HitTarget,
        at_ms: i64,
        ctx: &InteractionContext,
    ) -> Vec<Effect> {
        if !self.is_idle() {
            log::error!(
                "Pointer down while a {:?} gesture is active; discarding it",
                self.kind()
            );
            debug_assert!(false, "pointer down while a gesture is active");
            self.state = InteractionState::Idle;
        }

        let window = ctx.settings.double_activation_ms;

        match target {
            HitTarget::Background { layer_id } => {
                if self.is_double_activation(ActivationTarget::Background, at_ms, window) {
                    self.last_activation = None;
                    self.state = InteractionState::Creating(CreateContext::begin(
                        x, layer_id, at_ms, ctx,
                    ));
                } else {
                    self.state = InteractionState::Selecting(MarqueeContext::begin(x, at_ms));
                }
                Vec::new()
            }
            HitTarget::Body(id) => {
                if self.is_double_activation(ActivationTarget::Interval(id), at_ms, window) {
                    self.last_activation = None;
                    log::debug!("Edit requested for interval {}", id);
                    return vec![Effect::EditRequested(id)];
                }

                match DragContext::from_interval(id, x, at_ms, ctx) {
                    Some(drag) => self.state = InteractionState::Dragging(drag),
                    None => log::warn!("Pointer down on unknown interval {}", id),
                }
                Vec::new()
            }
            HitTarget::StartHandle(id) => self.begin_resize(id, ResizeEdge::Start, x, ctx),
            HitTarget::EndHandle(id) => self.begin_resize(id, ResizeEdge::End, x, ctx),
        }
    }

    fn begin_resize(
        &mut self,
        id: IntervalId,
        edge: ResizeEdge,
        x: f64,
        ctx: &InteractionContext,
    ) -> Vec<Effect> {
        match ResizeContext::from_interval(id, edge, x, ctx) {
            Some(resize) => self.state = InteractionState::Resizing(resize),
            None => log::warn!("Pointer down on handle of unknown interval {}", id),
        }
        Vec::new()
    }

    fn pointer_move(&mut self, x: f64, ctx: &InteractionContext) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Creating(create) => create.update(x, ctx),
            InteractionState::Selecting(marquee) => marquee.update(x),
            InteractionState::Dragging(drag) => drag.update(x, ctx),
            InteractionState::Resizing(resize) => resize.update(x, ctx),
        }
    }

    fn pointer_up(&mut self, ctx: &InteractionContext) -> Vec<Effect> {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Vec::new(),
            InteractionState::Creating(create) => create.finish(ctx),
            InteractionState::Selecting(marquee) => {
                self.last_activation = (marquee.width_px() < ctx.drag_threshold_px()).then_some(
                    Activation {
                        target: ActivationTarget::Background,
                        at_ms: marquee.pressed_at,
                    },
                );
                marquee.finish(ctx)
            }
            InteractionState::Dragging(drag) => {
                if drag.committed {
                    self.last_activation = None;
                    drag.finish()
                } else {
                    let id = drag.primary();
                    self.last_activation = Some(Activation {
                        target: ActivationTarget::Interval(id),
                        at_ms: drag.pressed_at,
                    });
                    vec![Effect::SetSelection(vec![id])]
                }
            }
            InteractionState::Resizing(resize) => {
                self.last_activation = None;
                resize.finish()
            }
        }
    }
}
