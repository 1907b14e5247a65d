//! Interval collection entry point.
//! Holds every interval in insertion order; CRUD and queries live in focused
//! submodules. End times are always derived through the store's calendar.

use crate::models::interval::Interval;
use crate::utils::date::Calendar;

pub mod crud;
pub mod queries;

/// In-memory interval collection for one editing session.
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    pub(crate) calendar: Calendar,
    pub(crate) intervals: Vec<Interval>,
}

impl IntervalStore {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            intervals: Vec::new(),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
