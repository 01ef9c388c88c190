//! Childcare session and reservation models.

use cercle_core::types::{Cents, DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;

/// A `garderie_sessions` row with its count of booked children.
#[derive(Debug, Clone, FromRow)]
pub struct GarderieSession {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub price_per_child_cents: Cents,
    pub status: String,
    pub event_id: Option<DbId>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub registered_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GarderieSession {
    pub fn available_places(&self) -> i32 {
        (self.capacity - self.registered_count).max(0)
    }
}

/// Writable fields of a childcare session. Updates replace every field.
#[derive(Debug, Clone)]
pub struct GarderieSessionInput {
    pub title: String,
    pub description: Option<String>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub price_per_child_cents: Cents,
    pub status: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

/// Row from the `garderie_reservations` table.
#[derive(Debug, Clone, FromRow)]
pub struct GarderieReservation {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub number_of_children: i32,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A childcare reservation joined with its session and user.
#[derive(Debug, Clone, FromRow)]
pub struct GarderieReservationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: DbId,
    pub number_of_children: i32,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub session_title: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

/// DTO for booking childcare places.
#[derive(Debug, Clone)]
pub struct CreateGarderieReservation {
    pub user_id: DbId,
    pub session_id: DbId,
    pub number_of_children: i32,
    pub total_price_cents: Cents,
    pub payment_intent_id: Option<String>,
}

/// Result of an atomic childcare booking attempt.
#[derive(Debug, Clone)]
pub enum GarderieBookingOutcome {
    Created(GarderieReservation),
    Full { remaining: i32 },
}
