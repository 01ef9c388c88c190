//! Views of a space's bookings built from the calendar endpoint.

use cercle_core::availability::{self, DayStatus, HourSlot, Interval, MonthGrid};
use cercle_core::error::CoreError;
use chrono::NaiveDate;

use crate::types::CalendarReservation;

/// Booked intervals of a calendar response.
pub fn intervals(reservations: &[CalendarReservation]) -> Vec<Interval> {
    reservations
        .iter()
        .map(|r| Interval::new(r.start_date_time, r.end_date_time))
        .collect()
}

/// Month grid with a status per day.
pub fn month_view(
    year: i32,
    month: u32,
    reservations: &[CalendarReservation],
    today: NaiveDate,
) -> Result<MonthGrid, CoreError> {
    availability::month_grid(year, month, &intervals(reservations), today)
}

/// Hour grid of one day, with the status of the whole day.
pub fn day_view(
    date: NaiveDate,
    reservations: &[CalendarReservation],
) -> (DayStatus, Vec<HourSlot>) {
    let booked = intervals(reservations);
    (
        availability::day_status(date, &booked),
        availability::hour_slots(date, &booked),
    )
}

/// Whether the hours `[start_hour, end_hour)` of `date` can be selected.
pub fn can_select(
    date: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    reservations: &[CalendarReservation],
) -> bool {
    availability::range_is_free(date, start_hour, end_hour, &intervals(reservations))
}
