//! Space availability grids.
//!
//! Maps a list of booked intervals onto the hour grid of one day and onto
//! the day grid of one month. The same functions back the public day-slots
//! endpoint and the client-side calendar views, so both always agree on
//! what "reserved" means.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// First bookable hour of the day.
pub const OPENING_HOUR: u32 = 7;

/// Closing hour; the last slot starts one hour earlier.
pub const CLOSING_HOUR: u32 = 22;

/// A day counts as full once this share of the opening window is booked.
pub const FULL_DAY_RATIO: f64 = 0.9;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A booked period on a space.
///
/// Field names on the wire match the calendar endpoint payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(rename = "startDateTime")]
    pub start: NaiveDateTime,
    #[serde(rename = "endDateTime")]
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: touching intervals do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        overlaps(self.start, self.end, start, end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Reserved,
}

/// One bookable hour, `hour:00` to `hour+1:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSlot {
    pub hour: u32,
    pub status: SlotStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Available,
    Partial,
    Full,
}

/// One cell of the month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Days before today cannot be selected.
    pub is_past: bool,
}

/// A month laid out for a Monday-first week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Number of empty cells before the 1st (0 when the month starts on Monday).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// `[a_start, a_end)` and `[b_start, b_end)` share at least one instant.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Status of every opening hour on `date`.
///
/// An hour is reserved when any interval overlaps `[h:00:00, h:59:59]`.
pub fn hour_slots(date: NaiveDate, booked: &[Interval]) -> Vec<HourSlot> {
    (OPENING_HOUR..CLOSING_HOUR)
        .map(|hour| {
            let slot_start = date.and_time(hms(hour, 0, 0));
            let slot_end = date.and_time(hms(hour, 59, 59));
            let reserved = booked.iter().any(|b| b.overlaps(slot_start, slot_end));
            HourSlot {
                hour,
                status: if reserved {
                    SlotStatus::Reserved
                } else {
                    SlotStatus::Available
                },
            }
        })
        .collect()
}

/// Summarise how booked `date` is within the opening window.
///
/// Intervals are clipped to the window and merged before counting, so
/// overlapping entries are not counted twice.
pub fn day_status(date: NaiveDate, booked: &[Interval]) -> DayStatus {
    let open = date.and_time(hms(OPENING_HOUR, 0, 0));
    let close = date.and_time(hms(CLOSING_HOUR, 0, 0));

    let mut clipped: Vec<(NaiveDateTime, NaiveDateTime)> = booked
        .iter()
        .filter(|b| b.overlaps(open, close))
        .map(|b| (b.start.max(open), b.end.min(close)))
        .collect();

    if clipped.is_empty() {
        return DayStatus::Available;
    }

    clipped.sort_by_key(|(start, _)| *start);

    let mut reserved_minutes = 0i64;
    let mut current = clipped[0];
    for &(start, end) in &clipped[1..] {
        if start <= current.1 {
            current.1 = current.1.max(end);
        } else {
            reserved_minutes += (current.1 - current.0).num_minutes();
            current = (start, end);
        }
    }
    reserved_minutes += (current.1 - current.0).num_minutes();

    let open_minutes = i64::from(CLOSING_HOUR - OPENING_HOUR) * 60;
    if reserved_minutes as f64 >= open_minutes as f64 * FULL_DAY_RATIO {
        DayStatus::Full
    } else if reserved_minutes > 0 {
        DayStatus::Partial
    } else {
        DayStatus::Available
    }
}

/// First instant and last second of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), CoreError> {
    let first = first_of_month(year, month)?;
    let last = last_of_month(first);
    Ok((
        first.and_time(NaiveTime::MIN),
        last.and_time(hms(23, 59, 59)),
    ))
}

/// Lay out `year`/`month` with a status per day.
pub fn month_grid(
    year: i32,
    month: u32,
    booked: &[Interval],
    today: NaiveDate,
) -> Result<MonthGrid, CoreError> {
    let first = first_of_month(year, month)?;
    let last = last_of_month(first);

    let days = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| CalendarDay {
            date,
            status: day_status(date, booked),
            is_past: date < today,
        })
        .collect();

    Ok(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    })
}

/// Whether `hour` falls inside the selection `[start_hour, end_hour)`.
pub fn selected_range_contains(hour: u32, start_hour: u32, end_hour: u32) -> bool {
    hour >= start_hour && hour < end_hour
}

/// Whether every hour of `[start_hour, end_hour)` on `date` is free.
pub fn range_is_free(date: NaiveDate, start_hour: u32, end_hour: u32, booked: &[Interval]) -> bool {
    if end_hour <= start_hour || end_hour > 24 {
        return false;
    }
    let start = date.and_time(hms(start_hour, 0, 0));
    let end = if end_hour == 24 {
        (date + Duration::days(1)).and_time(NaiveTime::MIN)
    } else {
        date.and_time(hms(end_hour, 0, 0))
    };
    !booked.iter().any(|b| b.overlaps(start, end))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::validation(format!("Mois invalide: {year}-{month}")))
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).unwrap_or(first)
}

fn hms(hour: u32, min: u32, sec: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, sec).unwrap_or(NaiveTime::MIN)
}
