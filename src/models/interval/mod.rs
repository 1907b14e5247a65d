// Interval module
// Grid-anchored time interval model
//
// An interval stores its start and a span expressed in grid units. The end is never
// stored: it is recomputed from {start_time, grid_unit, grid_amount} on every call so
// a "two month" interval stays two months wherever it is moved.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::grid::GridUnit;
use crate::utils::date::{Calendar, Timestamp};

/// Opaque, immutable interval identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(pub Uuid);

impl IntervalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IntervalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form data carried with an interval. Never read by the arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

/// Clamp a computed span to the minimum viable interval of one grid unit.
pub fn clamp_grid_amount(raw: i64) -> u32 {
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// Round a fractional span and clamp it to at least one grid unit.
pub fn round_grid_amount(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 1;
    }
    clamp_grid_amount(raw.round() as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub id: IntervalId,
    pub start_time: Timestamp,
    pub grid_unit: GridUnit,
    pub grid_amount: u32,
    #[serde(default)]
    pub metadata: IntervalMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
}

impl Interval {
    /// Create a new interval with a fresh id
    ///
    /// # Examples
    /// ```
    /// use interval_grid::models::grid::GridUnit;
    /// use interval_grid::models::interval::Interval;
    /// use interval_grid::utils::date::Calendar;
    ///
    /// let calendar = Calendar::default();
    /// let july = calendar.ymd(2025, 7, 1).unwrap();
    /// let interval = Interval::new(july, GridUnit::Month, 1).unwrap();
    /// assert_eq!(interval.end_time(&calendar), calendar.ymd(2025, 8, 1).unwrap());
    /// ```
    pub fn new(start_time: Timestamp, grid_unit: GridUnit, grid_amount: u32) -> Result<Self, String> {
        let interval = Self {
            id: IntervalId::new(),
            start_time,
            grid_unit,
            grid_amount,
            metadata: IntervalMetadata::default(),
            layer_id: None,
        };
        interval.validate()?;
        Ok(interval)
    }

    pub fn builder() -> IntervalBuilder {
        IntervalBuilder::new()
    }

    /// Basic shape checks
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_amount < 1 {
            return Err("Interval must span at least one grid unit".to_string());
        }

        if !Calendar::default().is_supported(self.start_time) {
            return Err(format!(
                "Start {} is outside the supported date range",
                self.start_time
            ));
        }

        if let Some(ref color) = self.metadata.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    /// End instant: start advanced by `grid_amount` units of `grid_unit`.
    pub fn end_time(&self, calendar: &Calendar) -> Timestamp {
        calendar.advance(self.start_time, self.grid_unit, i64::from(self.grid_amount))
    }

    /// Half-open `[start, end)` span.
    pub fn span(&self, calendar: &Calendar) -> (Timestamp, Timestamp) {
        (self.start_time, self.end_time(calendar))
    }

    /// Length in milliseconds
    pub fn duration(&self, calendar: &Calendar) -> i64 {
        (self.end_time(calendar) - self.start_time).max(0)
    }

    /// Half-open overlap test: `a.start < b.end && a.end > b.start`.
    pub fn overlaps(&self, other: &Interval, calendar: &Calendar) -> bool {
        let (start, end) = other.span(calendar);
        self.overlaps_range(start, end, calendar)
    }

    pub fn overlaps_range(&self, start: Timestamp, end: Timestamp, calendar: &Calendar) -> bool {
        self.start_time < end && self.end_time(calendar) > start
    }

    pub fn on_layer(&self, layer_id: Option<&str>) -> bool {
        self.layer_id.as_deref() == layer_id
    }

    /// Same shape at a different start.
    pub fn moved_to(&self, start_time: Timestamp) -> Interval {
        Interval {
            start_time,
            ..self.clone()
        }
    }

    /// Copy with a freshly generated id.
    pub fn clone_with_new_id(&self) -> Interval {
        Interval {
            id: IntervalId::new(),
            ..self.clone()
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &IntervalPatch) {
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(grid_unit) = patch.grid_unit {
            self.grid_unit = grid_unit;
        }
        if let Some(grid_amount) = patch.grid_amount {
            self.grid_amount = grid_amount;
        }
        if let Some(ref metadata) = patch.metadata {
            self.metadata = metadata.clone();
        }
        if let Some(ref layer_id) = patch.layer_id {
            self.layer_id = layer_id.clone();
        }
    }
}

/// Partial update of an interval; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntervalPatch {
    pub start_time: Option<Timestamp>,
    pub grid_unit: Option<GridUnit>,
    pub grid_amount: Option<u32>,
    pub metadata: Option<IntervalMetadata>,
    pub layer_id: Option<Option<String>>,
}

impl IntervalPatch {
    pub fn start(start_time: Timestamp) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    pub fn amount(grid_amount: u32) -> Self {
        Self {
            grid_amount: Some(grid_amount),
            ..Self::default()
        }
    }

    pub fn start_and_amount(start_time: Timestamp, grid_amount: u32) -> Self {
        Self {
            start_time: Some(start_time),
            grid_amount: Some(grid_amount),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Builder for creating intervals with optional fields
pub struct IntervalBuilder {
    start_time: Option<Timestamp>,
    grid_unit: Option<GridUnit>,
    grid_amount: u32,
    metadata: IntervalMetadata,
    layer_id: Option<String>,
}

impl IntervalBuilder {
    pub fn new() -> Self {
        Self {
            start_time: None,
            grid_unit: None,
            grid_amount: 1,
            metadata: IntervalMetadata::default(),
            layer_id: None,
        }
    }

    pub fn start(mut self, start_time: Timestamp) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn unit(mut self, grid_unit: GridUnit) -> Self {
        self.grid_unit = Some(grid_unit);
        self
    }

    pub fn amount(mut self, grid_amount: u32) -> Self {
        self.grid_amount = grid_amount;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.metadata.label = Some(label.into());
        self
    }

    /// Set the color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.metadata.color = Some(color.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.insert(tag.into());
        self
    }

    pub fn metadata(mut self, metadata: IntervalMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn layer(mut self, layer_id: impl Into<String>) -> Self {
        self.layer_id = Some(layer_id.into());
        self
    }

    pub fn build(self) -> Result<Interval, String> {
        let start_time = self.start_time.ok_or("Interval start time is required")?;
        let grid_unit = self.grid_unit.ok_or("Interval grid unit is required")?;

        let interval = Interval {
            id: IntervalId::new(),
            start_time,
            grid_unit,
            grid_amount: self.grid_amount,
            metadata: self.metadata,
            layer_id: self.layer_id,
        };

        interval.validate()?;
        Ok(interval)
    }
}

impl Default for IntervalBuilder {
    fn default() -> Self {
        Self::new()
    }
}
