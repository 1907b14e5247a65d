// Pointer hit testing
//
// Classifies a pointer position against the intervals drawn in one row:
// edge handles resize, the body drags, anything else is background.

use crate::models::interval::{Interval, IntervalId};
use crate::services::geometry::GridGeometry;

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty grid; `layer_id` is the row the pointer is over
    Background { layer_id: Option<String> },
    Body(IntervalId),
    /// Handle on the start edge - adjusts start time and amount
    StartHandle(IntervalId),
    /// Handle on the end edge - adjusts amount only
    EndHandle(IntervalId),
}

impl HitTarget {
    pub fn background() -> Self {
        HitTarget::Background { layer_id: None }
    }

    pub fn interval_id(&self) -> Option<IntervalId> {
        match self {
            HitTarget::Background { .. } => None,
            HitTarget::Body(id) | HitTarget::StartHandle(id) | HitTarget::EndHandle(id) => {
                Some(*id)
            }
        }
    }

    pub fn is_handle(&self) -> bool {
        matches!(self, HitTarget::StartHandle(_) | HitTarget::EndHandle(_))
    }
}

/// Classify `x` against the intervals of one row. Later intervals in `row` are
/// drawn on top and win.
pub fn hit_test(
    x: f64,
    row: &[&Interval],
    layer_id: Option<&str>,
    geometry: &GridGeometry,
    handle_width_px: f64,
) -> HitTarget {
    let calendar = geometry.calendar();

    for interval in row.iter().rev() {
        let (start, end) = interval.span(calendar);
        let (x0, x1) = geometry.span_to_pixels(start, end);
        if x < x0 || x > x1 {
            continue;
        }

        let from_start = x - x0;
        let from_end = x1 - x;
        let near_start = from_start <= handle_width_px;
        let near_end = from_end <= handle_width_px;

        return match (near_start, near_end) {
            (true, true) if from_end < from_start => HitTarget::EndHandle(interval.id),
            (true, _) => HitTarget::StartHandle(interval.id),
            (false, true) => HitTarget::EndHandle(interval.id),
            (false, false) => HitTarget::Body(interval.id),
        };
    }

    HitTarget::Background {
        layer_id: layer_id.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::{GridSettings, GridUnit};
    use crate::services::geometry::ViewportBounds;
    use crate::utils::date::{Calendar, Timestamp, MS_PER_DAY};

    fn ts(year: i32, month: u32, day: u32) -> Timestamp {
        Calendar::default().ymd(year, month, day).unwrap()
    }

    fn day_geometry() -> GridGeometry {
        GridGeometry::new(
            Calendar::default(),
            GridSettings::new(GridUnit::Day, 1).unwrap(),
            ViewportBounds::new(ts(2025, 1, 1), ts(2025, 3, 1), 2000.0),
            60.0,
            ts(2025, 1, 1),
            500,
        )
        .unwrap()
    }

    #[test]
    fn test_body_and_handles() {
        let geometry = day_geometry();
        // Jan 2 .. Jan 5 -> x 60..240
        let interval = Interval::new(ts(2025, 1, 2), GridUnit::Day, 3).unwrap();
        let row = [&interval];

        assert_eq!(
            hit_test(62.0, &row, None, &geometry, 6.0),
            HitTarget::StartHandle(interval.id)
        );
        assert_eq!(
            hit_test(237.0, &row, None, &geometry, 6.0),
            HitTarget::EndHandle(interval.id)
        );
        assert_eq!(
            hit_test(150.0, &row, None, &geometry, 6.0),
            HitTarget::Body(interval.id)
        );
        assert_eq!(
            hit_test(300.0, &row, Some("team"), &geometry, 6.0),
            HitTarget::Background {
                layer_id: Some("team".to_string())
            }
        );
    }

    #[test]
    fn test_topmost_wins() {
        let geometry = day_geometry();
        let below = Interval::new(ts(2025, 1, 1), GridUnit::Day, 10).unwrap();
        let above = Interval::new(ts(2025, 1, 3) + MS_PER_DAY / 2, GridUnit::Day, 2).unwrap();
        let target = hit_test(180.0, &[&below, &above], None, &geometry, 6.0);
        assert_eq!(target, HitTarget::Body(above.id));
    }

    #[test]
    fn test_narrow_interval_picks_closest_edge() {
        let geometry = day_geometry();
        let interval = Interval::new(ts(2025, 1, 2), GridUnit::Day, 1).unwrap();
        // 60..120 with 40px handles overlapping in the middle
        assert_eq!(
            hit_test(110.0, &[&interval], None, &geometry, 40.0),
            HitTarget::EndHandle(interval.id)
        );
        assert_eq!(
            hit_test(70.0, &[&interval], None, &geometry, 40.0),
            HitTarget::StartHandle(interval.id)
        );
    }
}
