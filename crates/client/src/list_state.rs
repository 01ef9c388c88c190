//! Optimistic list updates.
//!
//! After a successful delete or cancel the front end updates the list it
//! already holds instead of fetching it again.

use cercle_core::types::DbId;

use crate::types::{
    AdminBooking, Espace, Event, GarderieReservation, GarderieSession, Registration, Reservation,
    User,
};

/// Status written by a successful cancellation.
pub const CANCELLED: &str = "CANCELLED";

/// A record with an id.
pub trait Identified {
    fn id(&self) -> DbId;
}

/// A record whose status string can be rewritten.
pub trait HasStatus: Identified {
    fn set_status(&mut self, status: &str);
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> DbId {
                self.id
            }
        })*
    };
}

macro_rules! has_status {
    ($($ty:ty),* $(,)?) => {
        $(impl HasStatus for $ty {
            fn set_status(&mut self, status: &str) {
                self.status = status.to_string();
            }
        })*
    };
}

identified!(
    User,
    Espace,
    Reservation,
    Event,
    Registration,
    GarderieSession,
    GarderieReservation,
    AdminBooking,
);

has_status!(
    User,
    Espace,
    Reservation,
    Event,
    Registration,
    GarderieSession,
    GarderieReservation,
    AdminBooking,
);

/// Drop the item with `id`. Returns whether something was removed.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: DbId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Set the status of the item with `id`. Returns whether it was found.
pub fn set_status_by_id<T: HasStatus>(items: &mut [T], id: DbId, status: &str) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            item.set_status(status);
            true
        }
        None => false,
    }
}

/// Mark the item with `id` as cancelled.
pub fn mark_cancelled<T: HasStatus>(items: &mut [T], id: DbId) -> bool {
    set_status_by_id(items, id, CANCELLED)
}

/// Replace the item with the same id, e.g. with the body of a PUT response.
pub fn replace<T: Identified>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}
