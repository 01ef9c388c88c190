//! Space reservation model and DTOs.

use cercle_core::types::{Cents, DbId, LocalDateTime, Timestamp};
use sqlx::FromRow;

/// Row from the `reservations` table.
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: DbId,
    pub user_id: DbId,
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub justification: Option<String>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A reservation joined with its user and space.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub justification: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    pub user_role: String,
    pub user_status: String,
    pub user_created_at: Timestamp,
    pub espace_name: String,
    pub espace_type: Option<String>,
    pub espace_capacity: Option<i32>,
    pub espace_base_price_cents: Cents,
    pub espace_status: String,
}

/// A booked interval, as shown on the public calendar.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarEntry {
    pub id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
}

/// DTO for inserting a reservation.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub user_id: DbId,
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub justification: Option<String>,
}
