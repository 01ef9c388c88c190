//! Event registration model and DTOs.

use cercle_core::types::{Cents, DbId, LocalDateTime, Timestamp};
use sqlx::FromRow;

use super::garderie::CreateGarderieReservation;

/// Row from the `event_registrations` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRegistration {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub number_of_participants: i32,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A registration joined with its event and user.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub number_of_participants: i32,
    pub total_price_cents: Cents,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub event_title: String,
    pub event_start_date_time: LocalDateTime,
    pub event_end_date_time: LocalDateTime,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

/// DTO for registering to an event, optionally with childcare.
#[derive(Debug, Clone)]
pub struct CreateRegistration {
    pub user_id: DbId,
    pub event_id: DbId,
    pub number_of_participants: i32,
    pub total_price_cents: Cents,
    pub payment_intent_id: Option<String>,
    pub childcare: Option<CreateGarderieReservation>,
}

/// Result of an atomic registration attempt.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    Created(EventRegistration),
    /// The event has no room for the requested participants.
    EventFull,
    /// The childcare session has fewer places than requested.
    ChildcareFull { remaining: i32 },
}
