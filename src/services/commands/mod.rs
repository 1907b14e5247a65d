// Interval Command System
//
// Every mutation of the interval collection, whether from a gesture or a batch
// operation, is expressed as a command and applied through a single queue so
// command application is serialised.

use std::collections::VecDeque;

use crate::error::{EditorError, EditorResult};
use crate::models::interval::{Interval, IntervalId, IntervalPatch};
use crate::services::interval::IntervalStore;

/// A single mutation against the interval collection
pub trait Command: std::fmt::Debug {
    /// Apply the command
    fn execute(&self, store: &mut IntervalStore) -> EditorResult<()>;

    /// Get a human-readable description of the command
    fn description(&self) -> String;
}

/// Command for creating an interval
#[derive(Debug, Clone)]
pub struct CreateIntervalCommand {
    interval: Interval,
}

impl CreateIntervalCommand {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }
}

impl Command for CreateIntervalCommand {
    fn execute(&self, store: &mut IntervalStore) -> EditorResult<()> {
        store.insert(self.interval.clone())?;
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Create interval {} ({} {})",
            self.interval.id, self.interval.grid_amount, self.interval.grid_unit
        )
    }
}

/// Command for updating an interval
#[derive(Debug, Clone)]
pub struct UpdateIntervalCommand {
    pub id: IntervalId,
    pub patch: IntervalPatch,
}

impl UpdateIntervalCommand {
    pub fn new(id: IntervalId, patch: IntervalPatch) -> Self {
        Self { id, patch }
    }
}

impl Command for UpdateIntervalCommand {
    fn execute(&self, store: &mut IntervalStore) -> EditorResult<()> {
        store.update_interval(&self.id, &self.patch)
    }

    fn description(&self) -> String {
        format!("Update interval {}", self.id)
    }
}

/// Command for deleting an interval
#[derive(Debug, Clone)]
pub struct DeleteIntervalCommand {
    pub id: IntervalId,
}

impl DeleteIntervalCommand {
    pub fn new(id: IntervalId) -> Self {
        Self { id }
    }
}

impl Command for DeleteIntervalCommand {
    fn execute(&self, store: &mut IntervalStore) -> EditorResult<()> {
        store.delete_interval(&self.id)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete interval {}", self.id)
    }
}

/// Outcome of draining the queue
#[derive(Debug, Default)]
pub struct CommandReport {
    pub applied: Vec<String>,
    pub rejected: Vec<(String, EditorError)>,
}

impl CommandReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// FIFO of pending commands. Commands run one at a time in submission order;
/// a rejected command is reported and does not stop the ones after it.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Box<dyn Command>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.pending.push_back(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Box<dyn Command>>) {
        self.pending.extend(commands);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending command against `store`.
    pub fn run(&mut self, store: &mut IntervalStore) -> CommandReport {
        let mut report = CommandReport::default();

        while let Some(command) = self.pending.pop_front() {
            let description = command.description();
            match command.execute(store) {
                Ok(()) => {
                    log::info!("{}", description);
                    report.applied.push(description);
                }
                Err(err) => {
                    log::warn!("{} rejected: {}", description, err);
                    report.rejected.push((description, err));
                }
            }
        }

        report
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::GridUnit;
    use crate::utils::date::Calendar;

    fn create_test_interval() -> Interval {
        Interval::new(0, GridUnit::Day, 2).unwrap()
    }

    #[test]
    fn test_create_interval_command_description() {
        let interval = create_test_interval();
        let cmd = CreateIntervalCommand::new(interval.clone());
        assert_eq!(
            cmd.description(),
            format!("Create interval {} (2 day)", interval.id)
        );
    }

    #[test]
    fn test_queue_applies_in_order() {
        let mut store = IntervalStore::new(Calendar::default());
        let interval = create_test_interval();
        let id = interval.id;

        let mut queue = CommandQueue::new();
        queue.push(Box::new(CreateIntervalCommand::new(interval)));
        queue.push(Box::new(UpdateIntervalCommand::new(id, IntervalPatch::amount(5))));
        assert_eq!(queue.len(), 2);

        let report = queue.run(&mut store);
        assert!(report.is_clean());
        assert_eq!(report.applied.len(), 2);
        assert!(queue.is_empty());
        assert_eq!(store.get(&id).unwrap().grid_amount, 5);
    }

    #[test]
    fn test_rejected_command_does_not_stop_queue() {
        let mut store = IntervalStore::new(Calendar::default());
        let unknown = IntervalId::new();
        let interval = create_test_interval();

        let mut queue = CommandQueue::new();
        queue.push(Box::new(DeleteIntervalCommand::new(unknown)));
        queue.push(Box::new(CreateIntervalCommand::new(interval.clone())));

        let report = queue.run(&mut store);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].1, EditorError::UnknownInterval(unknown));
        assert!(store.contains(&interval.id));
    }
}
