// Date utility functions
// Calendar arithmetic for grid-aligned intervals.
//
// Two kinds of arithmetic live here and must not be mixed up:
// - Day steps are fixed 24h durations (no wall-clock or DST adjustment), which keeps
//   the day grid linear in pixel space.
// - Month and year steps shift the calendar date in the display zone, clamping to the
//   last day of a shorter month (Jan 31 + 1 month = Feb 28/29).

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::models::grid::GridUnit;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub const MS_PER_DAY: i64 = 86_400_000;

/// Calendar-aware arithmetic bound to a single display zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a calendar from an IANA zone name such as `"Europe/Berlin"`.
    pub fn from_zone_name(name: &str) -> Result<Self, String> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|e| format!("Unknown time zone '{}': {}", name, e))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Convert a timestamp into a zoned datetime for display.
    pub fn to_local(&self, t: Timestamp) -> Option<DateTime<Tz>> {
        Utc.timestamp_millis_opt(t)
            .single()
            .map(|dt| dt.with_timezone(&self.tz))
    }

    /// Timestamp of a wall-clock date and time in the display zone.
    pub fn timestamp_of(&self, naive: NaiveDateTime) -> Option<Timestamp> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.timestamp_millis()),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
            // Skipped by a forward transition: land just after the gap.
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    /// Midnight of the given date in the display zone.
    pub fn timestamp_of_date(&self, date: NaiveDate) -> Option<Timestamp> {
        self.timestamp_of(date.and_hms_opt(0, 0, 0)?)
    }

    fn naive_local(&self, t: Timestamp) -> Option<NaiveDateTime> {
        self.to_local(t).map(|dt| dt.naive_local())
    }

    /// `t` advanced by `amount` grid units.
    pub fn advance(&self, t: Timestamp, unit: GridUnit, amount: i64) -> Timestamp {
        self.checked_advance(t, unit, amount).unwrap_or_else(|| {
            log::error!(
                "Calendar overflow advancing {} by {} {}(s)",
                t,
                amount,
                unit
            );
            t
        })
    }

    /// Like [`Calendar::advance`], but `None` when the result leaves the
    /// supported calendar range.
    pub fn checked_advance(&self, t: Timestamp, unit: GridUnit, amount: i64) -> Option<Timestamp> {
        let shifted = match unit {
            GridUnit::Day => amount
                .checked_mul(MS_PER_DAY)
                .and_then(|delta| t.checked_add(delta)),
            GridUnit::Month => self.shift_months(t, amount),
            GridUnit::Year => amount
                .checked_mul(12)
                .and_then(|months| self.shift_months(t, months)),
        }?;
        self.is_supported(shifted).then_some(shifted)
    }

    /// Whether `t` can be shown as a date in the display zone.
    pub fn is_supported(&self, t: Timestamp) -> bool {
        self.to_local(t).is_some()
    }

    /// End of a span of `amount` units from `start`, or an error when either
    /// edge falls outside the supported calendar range.
    pub fn checked_span_end(
        &self,
        start: Timestamp,
        unit: GridUnit,
        amount: u32,
    ) -> Result<Timestamp, String> {
        if !self.is_supported(start) {
            return Err(format!("Start {} is outside the supported date range", start));
        }
        self.checked_advance(start, unit, i64::from(amount))
            .ok_or_else(|| {
                format!(
                    "{} {}(s) from {} ends outside the supported date range",
                    amount,
                    unit,
                    self.format(start)
                )
            })
    }

    fn shift_months(&self, t: Timestamp, months: i64) -> Option<Timestamp> {
        let naive = self.naive_local(t)?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let shifted = if months >= 0 {
            naive.checked_add_months(magnitude)?
        } else {
            naive.checked_sub_months(magnitude)?
        };
        self.timestamp_of(shifted)
    }

    /// Advance by a possibly fractional unit count. The whole part uses calendar
    /// arithmetic and the remainder is a proportion of the following cell.
    pub fn advance_fractional(&self, t: Timestamp, unit: GridUnit, amount: f64) -> Timestamp {
        if unit == GridUnit::Day {
            return t + (amount * MS_PER_DAY as f64).round() as i64;
        }

        let whole = amount.floor();
        let fraction = amount - whole;
        let base = self.advance(t, unit, whole as i64);
        if fraction == 0.0 {
            return base;
        }
        let next = self.advance(t, unit, whole as i64 + 1);
        base + (fraction * (next - base) as f64).round() as i64
    }

    /// How many `unit`s lie between `from` and `to`, such that
    /// `advance_fractional(from, unit, difference(from, to, unit)) == to`.
    ///
    /// Negative when `to` precedes `from`. Callers round as they need.
    pub fn difference(&self, from: Timestamp, to: Timestamp, unit: GridUnit) -> f64 {
        if unit == GridUnit::Day {
            return (to - from) as f64 / MS_PER_DAY as f64;
        }

        if !self.is_supported(from) || !self.is_supported(to) {
            log::error!("Difference of {} and {} is outside the calendar range", from, to);
            return 0.0;
        }

        // The cell-index estimate is off by at most one in either direction.
        let mut whole = self.cell_index(to, unit) - self.cell_index(from, unit);
        let mut base = loop {
            match self.checked_advance(from, unit, whole) {
                Some(base) if base > to => whole -= 1,
                Some(base) => break base,
                None => return whole as f64,
            }
        };
        let next = loop {
            match self.checked_advance(from, unit, whole + 1) {
                Some(next) if next <= to => {
                    whole += 1;
                    base = next;
                }
                Some(next) => break next,
                None => return whole as f64,
            }
        };

        let span = next - base;
        if span <= 0 {
            return whole as f64;
        }
        whole as f64 + (to - base) as f64 / span as f64
    }

    /// Start of the day, month or year containing `t`.
    pub fn start_of_unit(&self, t: Timestamp, unit: GridUnit) -> Timestamp {
        self.cell_start(self.cell_index(t, unit), unit)
    }

    /// Index of the grid cell containing `t`, counted from a fixed origin:
    /// days since 1970-01-01, months as `year * 12 + month0`, or the calendar year.
    pub fn cell_index(&self, t: Timestamp, unit: GridUnit) -> i64 {
        let Some(local) = self.naive_local(t) else {
            log::error!("Timestamp {} is outside the supported calendar range", t);
            return 0;
        };
        let date = local.date();
        match unit {
            GridUnit::Day => date.signed_duration_since(epoch_date()).num_days(),
            GridUnit::Month => i64::from(date.year()) * 12 + i64::from(date.month0()),
            GridUnit::Year => i64::from(date.year()),
        }
    }

    /// First instant of the cell with the given index.
    ///
    /// Day cells start at local midnight. A one-day span is a fixed 24h, so in a
    /// DST zone it ends an hour off the next cell start on transition days.
    pub fn cell_start(&self, index: i64, unit: GridUnit) -> Timestamp {
        let date = match unit {
            GridUnit::Day => epoch_date().checked_add_signed(Duration::days(index)),
            GridUnit::Month => i32::try_from(index.div_euclid(12)).ok().and_then(|year| {
                NaiveDate::from_ymd_opt(year, index.rem_euclid(12) as u32 + 1, 1)
            }),
            GridUnit::Year => i32::try_from(index)
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
        };

        match date.and_then(|d| self.timestamp_of_date(d)) {
            Some(ts) => ts,
            None => {
                log::error!("Cell {} of unit {} is outside the calendar range", index, unit);
                0
            }
        }
    }

    /// Whether `t` is the first instant of a month.
    pub fn is_month_start(&self, t: Timestamp) -> bool {
        self.start_of_unit(t, GridUnit::Month) == t
    }

    /// Whether `t` is the first instant of a year.
    pub fn is_year_start(&self, t: Timestamp) -> bool {
        self.start_of_unit(t, GridUnit::Year) == t
    }

    /// Timestamp of midnight on `year-month-day` in the display zone.
    pub fn ymd(&self, year: i32, month: u32, day: u32) -> Option<Timestamp> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|d| self.timestamp_of_date(d))
    }

    /// Format a timestamp as `YYYY-MM-DD HH:MM` in the display zone.
    pub fn format(&self, t: Timestamp) -> String {
        match self.to_local(t) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => format!("<{}ms>", t),
        }
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}
