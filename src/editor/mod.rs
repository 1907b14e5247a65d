//! Interval editor coordinator.
//!
//! `IntervalEditor` owns everything one editing session mutates: the interval
//! store, the selection, the clipboard, the gesture state machine and the command
//! queue. All mutations, interactive or programmatic, are applied through the queue.

use crate::error::{EditorError, EditorResult};
use crate::interaction::{
    hit_test, Effect, GestureKind, HitTarget, InteractionContext, InteractionMachine,
    PointerEvent, Preview,
};
use crate::models::grid::{GridSettings, GridUnit};
use crate::models::interval::{Interval, IntervalId, IntervalMetadata, IntervalPatch};
use crate::models::selection::Selection;
use crate::models::settings::EditorSettings;
use crate::services::batch::{BatchEngine, BatchPlan, Clipboard};
use crate::services::commands::{
    Command, CommandQueue, CommandReport, CreateIntervalCommand, DeleteIntervalCommand,
    UpdateIntervalCommand,
};
use crate::services::export::Snapshot;
use crate::services::geometry::{GridGeometry, ViewportBounds};
use crate::services::interval::IntervalStore;
use crate::utils::date::{Calendar, Timestamp};

/// Supplies the visible time range and drawable width.
#[cfg_attr(test, mockall::automock)]
pub trait ViewportProvider {
    fn bounds(&self) -> ViewportBounds;
}

/// Supplies the grid the user has chosen.
#[cfg_attr(test, mockall::automock)]
pub trait GridSettingsProvider {
    fn grid_settings(&self) -> GridSettings;
}

/// Something the surrounding UI should react to after a pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Created(IntervalId),
    /// Open the edit dialog for this interval
    EditRequested(IntervalId),
    Rejected(String),
}

#[derive(Debug)]
pub struct IntervalEditor {
    settings: EditorSettings,
    calendar: Calendar,
    store: IntervalStore,
    selection: Selection,
    clipboard: Clipboard,
    machine: InteractionMachine,
    queue: CommandQueue,
}

impl IntervalEditor {
    pub fn new(settings: EditorSettings) -> EditorResult<Self> {
        settings.validate().map_err(EditorError::InvalidSettings)?;
        let calendar = settings.calendar().map_err(EditorError::InvalidSettings)?;
        log::info!(
            "Interval editor ready: {} grid, timezone {}",
            settings.grid,
            settings.display_timezone
        );

        Ok(Self {
            settings,
            calendar,
            store: IntervalStore::new(calendar),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            machine: InteractionMachine::new(),
            queue: CommandQueue::new(),
        })
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    pub fn intervals(&self) -> &[Interval] {
        self.store.all()
    }

    pub fn get(&self, id: &IntervalId) -> Option<&Interval> {
        self.store.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn gesture(&self) -> GestureKind {
        self.machine.kind()
    }

    fn dispatch(&mut self, commands: Vec<Box<dyn Command>>) -> CommandReport {
        self.queue.extend(commands);
        self.queue.run(&mut self.store)
    }

    fn dispatch_one(&mut self, command: Box<dyn Command>) -> EditorResult<()> {
        let mut report = self.dispatch(vec![command]);
        match report.rejected.pop() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }

    // ----- Command surface -----

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
        self.insert_interval(interval)
    }

    /// Insert a fully built interval, keeping its id.
    pub fn insert_interval(&mut self, interval: Interval) -> EditorResult<IntervalId> {
        let id = interval.id;
        self.dispatch_one(Box::new(CreateIntervalCommand::new(interval)))?;
        Ok(id)
    }

    /// Apply `patch` to interval `id`. Unknown ids and invalid results are
    /// reported and leave the collection unchanged.
    pub fn update_interval(&mut self, id: &IntervalId, patch: IntervalPatch) -> EditorResult<()> {
        self.dispatch_one(Box::new(UpdateIntervalCommand::new(*id, patch)))
    }

    pub fn delete_interval(&mut self, id: &IntervalId) -> EditorResult<()> {
        self.dispatch_one(Box::new(DeleteIntervalCommand::new(*id)))?;
        self.selection.remove(id);
        Ok(())
    }

    /// Move an interval without changing its shape.
    pub fn move_interval_to(&mut self, id: &IntervalId, start_time: Timestamp) -> EditorResult<()> {
        let interval = self
            .store
            .get(id)
            .ok_or(EditorError::UnknownInterval(*id))?;
        let moved = interval.moved_to(start_time);
        if self.settings.prevent_overlap && self.store.overlaps_on_layer(&moved, &[]) {
            return Err(EditorError::Overlap);
        }
        self.update_interval(id, IntervalPatch::start(start_time))
    }

    pub fn query_overlaps(
        &self,
        start_time: Timestamp,
        grid_unit: GridUnit,
        grid_amount: u32,
        exclude: Option<&IntervalId>,
    ) -> bool {
        self.store
            .query_overlaps(start_time, grid_unit, grid_amount, exclude)
    }

    // ----- Selection -----

    /// Replace the selection. Unknown ids are dropped.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = IntervalId>) {
        let known: Vec<IntervalId> = ids
            .into_iter()
            .filter(|id| self.store.contains(id))
            .collect();
        self.selection.set(known);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.store.ids());
    }

    /// Add or remove one interval. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: IntervalId) -> bool {
        if !self.store.contains(&id) {
            return false;
        }
        self.selection.toggle(id)
    }

    // ----- Batch operations -----

    fn run_plan(&mut self, plan: BatchPlan) -> (CommandReport, Vec<IntervalId>) {
        let BatchPlan { commands, created } = plan;
        let report = self.dispatch(commands);
        let created = created
            .into_iter()
            .filter(|id| self.store.contains(id))
            .collect();
        (report, created)
    }

    /// Clone the selection into the clipboard and clear the selection.
    pub fn copy(&mut self) -> EditorResult<usize> {
        let clones = BatchEngine::new(&self.store).copy(&self.selection)?;
        let count = clones.len();
        self.clipboard.set(clones);
        self.selection.clear();
        log::info!("Copied {} interval(s)", count);
        Ok(count)
    }

    /// Insert the clipboard after its latest end. The pasted intervals become the
    /// selection and the clipboard is emptied.
    pub fn paste(&mut self) -> EditorResult<Vec<IntervalId>> {
        let plan = BatchEngine::new(&self.store).paste(&self.clipboard)?;
        let (report, created) = self.run_plan(plan);
        if !report.is_clean() {
            log::warn!("{} pasted interval(s) rejected", report.rejected.len());
        }
        self.selection.set(created.iter().copied());
        self.clipboard.clear();
        Ok(created)
    }

    /// Copy the selection in place after its latest end. The selection is kept.
    pub fn duplicate(&mut self) -> EditorResult<Vec<IntervalId>> {
        let plan = BatchEngine::new(&self.store).duplicate(&self.selection)?;
        let (report, created) = self.run_plan(plan);
        if !report.is_clean() {
            log::warn!("{} duplicated interval(s) rejected", report.rejected.len());
        }
        Ok(created)
    }

    /// Scale the selection around its earliest start. Returns how many intervals changed.
    pub fn scale(&mut self, factor: f64) -> EditorResult<usize> {
        let plan = BatchEngine::new(&self.store).scale(&self.selection, factor)?;
        let (report, _) = self.run_plan(plan);
        Ok(report.applied.len())
    }

    /// Delete the selection and clear it.
    pub fn delete_selected(&mut self) -> EditorResult<usize> {
        let plan = BatchEngine::new(&self.store).delete(&self.selection)?;
        let (report, _) = self.run_plan(plan);
        self.selection.clear();
        Ok(report.applied.len())
    }

    // ----- Grid and geometry -----

    pub fn set_grid(&mut self, grid: GridSettings) -> EditorResult<()> {
        grid.validate().map_err(EditorError::InvalidGridSettings)?;
        if grid != self.settings.grid {
            if !self.machine.is_idle() {
                log::debug!("Grid changed to {}; discarding active gesture", grid);
                self.machine.cancel();
            }
            self.settings.grid = grid;
        }
        Ok(())
    }

    pub fn geometry(&self, bounds: ViewportBounds) -> EditorResult<GridGeometry> {
        GridGeometry::from_settings(&self.settings, self.calendar, bounds)
    }

    /// Pull the current grid and viewport from their providers.
    pub fn refresh_geometry(
        &mut self,
        viewport: &dyn ViewportProvider,
        grid: &dyn GridSettingsProvider,
    ) -> EditorResult<GridGeometry> {
        self.set_grid(grid.grid_settings())?;
        self.geometry(viewport.bounds())
    }

    /// Pixel extent of an interval.
    pub fn interval_rect(&self, id: &IntervalId, geometry: &GridGeometry) -> Option<(f64, f64)> {
        self.store.get(id).map(|interval| {
            let (start, end) = interval.span(&self.calendar);
            geometry.span_to_pixels(start, end)
        })
    }

    pub fn visible_intervals(&self, geometry: &GridGeometry) -> Vec<&Interval> {
        let bounds = geometry.bounds();
        self.store.intervals_in_range(bounds.min, bounds.max)
    }

    // ----- Pointer input -----

    /// What lies under `x` in the row for `layer_id`.
    pub fn hit_test(&self, x: f64, layer_id: Option<&str>, geometry: &GridGeometry) -> HitTarget {
        let row: Vec<&Interval> = self
            .store
            .all()
            .iter()
            .filter(|interval| interval.on_layer(layer_id))
            .collect();
        hit_test(x, &row, layer_id, geometry, self.settings.handle_width_px)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, geometry: &GridGeometry) -> Vec<Notice> {
        let ctx = InteractionContext::new(&self.store, geometry, &self.selection, &self.settings);
        let transition = self.machine.handle_event(event, &ctx);
        self.apply_effects(transition.effects)
    }

    pub fn preview(&self, geometry: &GridGeometry) -> Option<Preview> {
        let ctx = InteractionContext::new(&self.store, geometry, &self.selection, &self.settings);
        self.machine.preview(&ctx)
    }

    pub fn cancel_gesture(&mut self) {
        self.machine.cancel();
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        let mut created = Vec::new();

        for effect in effects {
            match effect {
                Effect::Create {
                    start_time,
                    grid_unit,
                    grid_amount,
                    layer_id,
                } => match Interval::new(start_time, grid_unit, grid_amount) {
                    Ok(mut interval) => {
                        interval.layer_id = layer_id;
                        created.push(interval.id);
                        self.queue
                            .push(Box::new(CreateIntervalCommand::new(interval)));
                    }
                    Err(e) => notices.push(Notice::Rejected(e)),
                },
                Effect::Update { id, patch } => {
                    self.queue
                        .push(Box::new(UpdateIntervalCommand::new(id, patch)));
                }
                Effect::SetSelection(ids) => self.set_selection(ids),
                Effect::EditRequested(id) => notices.push(Notice::EditRequested(id)),
                Effect::Rejected(reason) => {
                    log::warn!("Gesture rejected: {}", reason);
                    notices.push(Notice::Rejected(reason));
                }
            }
        }

        let report = self.queue.run(&mut self.store);
        for (description, err) in report.rejected {
            notices.push(Notice::Rejected(format!("{}: {}", description, err)));
        }
        notices.extend(
            created
                .into_iter()
                .filter(|id| self.store.contains(id))
                .map(Notice::Created),
        );
        notices
    }

    // ----- Persistence -----

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.store.all().to_vec())
    }

    /// Replace every interval with the snapshot contents.
    /// Replace every interval with the snapshot's. A snapshot with a span outside
    /// the supported date range is rejected and nothing changes.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> EditorResult<()> {
        for interval in &snapshot.intervals {
            self.store.validate_span(interval)?;
        }
        log::info!("Loading {} interval(s) from snapshot", snapshot.intervals.len());
        self.machine.cancel();
        self.selection.clear();
        self.clipboard.clear();
        self.store.replace_all(snapshot.intervals);
        Ok(())
    }
}
