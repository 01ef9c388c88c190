//! Event entity model and DTOs.

use cercle_core::types::{Cents, DbId, LocalDateTime, Timestamp};
use sqlx::FromRow;

/// An event row joined with the names of its creator and approver, its
/// active participant count and its linked childcare session.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub capacity: i32,
    pub price_cents: Option<Cents>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub status: String,
    pub location_type: String,
    pub space_id: Option<DbId>,
    pub external_address: Option<String>,
    pub location: Option<String>,
    pub garderie_required: bool,
    pub created_by: Option<DbId>,
    pub created_by_name: Option<String>,
    pub approved_by: Option<DbId>,
    pub approved_by_name: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub registered_count: i32,
    pub garderie_session_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields produced by event planning; shared by create and update.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub capacity: i32,
    pub price_cents: Option<Cents>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub location_type: String,
    pub space_id: Option<DbId>,
    pub external_address: Option<String>,
    pub location: Option<String>,
    pub garderie_required: bool,
}

/// DTO for inserting an event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub fields: EventFields,
    pub status: String,
    pub created_by: DbId,
    /// Set when the event is published on creation; `approved_at` is then now.
    pub approved_by: Option<DbId>,
}
