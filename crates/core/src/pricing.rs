//! Server-side price computation.
//!
//! Every amount is computed in euro cents. Euros only appear at the JSON
//! boundary, converted with [`euros_to_cents`] / [`cents_to_euros`].

use chrono::NaiveDateTime;

use crate::error::CoreError;
use crate::types::Cents;

/// Space bookings are billed for at least one hour.
pub const MIN_BILLED_MINUTES: i64 = 60;

/// Convert a decimal euro amount to cents, rounding half away from zero.
pub fn euros_to_cents(euros: f64) -> Cents {
    (euros * 100.0).round() as Cents
}

/// Convert cents to a decimal euro amount.
pub fn cents_to_euros(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Price of booking a space from `start` to `end` at `hourly_cents` per hour.
///
/// Billed per minute with a one-hour minimum, rounded to the nearest cent.
pub fn space_price(
    hourly_cents: Cents,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Cents, CoreError> {
    let minutes = (end - start).num_minutes();
    if minutes <= 0 {
        return Err(CoreError::validation(
            "La date de fin doit être après la date de début",
        ));
    }
    Ok(prorate(hourly_cents, minutes.max(MIN_BILLED_MINUTES)))
}

/// Price of `hours` of a space, as requested by the payment form.
///
/// A missing or sub-hour value bills one hour.
pub fn space_price_for_hours(hourly_cents: Cents, hours: Option<f64>) -> Cents {
    let hours = hours.unwrap_or(1.0).max(1.0);
    (hourly_cents as f64 * hours).round() as Cents
}

/// Price of an event registration: `price × participants`.
///
/// A missing price means a free event.
pub fn event_price(price_cents: Option<Cents>, participants: i32) -> Cents {
    match price_cents {
        Some(price) if price > 0 => price * i64::from(participants.max(0)),
        _ => 0,
    }
}

/// Price of a childcare booking: `price_per_child × children`.
pub fn garderie_price(price_per_child_cents: Cents, children: i32) -> Cents {
    price_per_child_cents * i64::from(children.max(0))
}

/// Total of an event registration with the optional childcare add-on.
pub fn registration_total(
    event_price_cents: Option<Cents>,
    participants: i32,
    childcare: Option<(Cents, i32)>,
) -> Cents {
    let childcare_total = childcare
        .map(|(per_child, children)| garderie_price(per_child, children))
        .unwrap_or(0);
    event_price(event_price_cents, participants) + childcare_total
}

fn prorate(hourly_cents: Cents, minutes: i64) -> Cents {
    // Integer rounding to the nearest cent (half up) for non-negative inputs.
    (hourly_cents * minutes + 30) / 60
}
