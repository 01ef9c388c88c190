//! Request and response bodies of the REST API.
//!
//! Field names are camelCase on the wire; money is decimal euros. Statuses
//! are kept as the strings the service sends.

use cercle_core::types::{DbId, LocalDateTime, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users and authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == cercle_core::roles::ROLE_ADMIN
    }

    /// Organizers and admins may submit events.
    pub fn can_submit_events(&self) -> bool {
        cercle_core::roles::can_submit_events(&self.role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Spaces and reservations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Espace {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub espace_type: Option<String>,
    pub capacity: Option<i32>,
    /// Hourly price in euros.
    pub base_price: f64,
    pub status: String,
}

/// Body of the admin space create/replace endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EspaceForm {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub espace_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: DbId,
    pub user: User,
    pub espace: Espace,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price: f64,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub justification: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditoriumRequest {
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    pub justification: String,
}

/// One booked interval from the calendar endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarReservation {
    pub id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub espace_id: DbId,
    pub date: NaiveDate,
    pub status: cercle_core::availability::DayStatus,
    pub slots: Vec<cercle_core::availability::HourSlot>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub location: Option<String>,
    pub location_type: String,
    pub space_id: Option<DbId>,
    pub external_address: Option<String>,
    pub capacity: i32,
    pub price: Option<f64>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub status: String,
    pub registered_count: i32,
    pub available_places: i32,
    pub garderie_required: bool,
    pub garderie_session_id: Option<DbId>,
    pub created_by_name: Option<String>,
    pub rejection_reason: Option<String>,
}

/// Body of the organizer and admin event endpoints.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date_time: Option<LocalDateTime>,
    pub end_date_time: Option<LocalDateTime>,
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
    /// Only honoured by admin endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_address: Option<String>,
    pub garderie_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garderie_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garderie_capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationRequest {
    pub event_id: DbId,
    pub number_of_participants: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub add_childcare: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_children: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: DbId,
    pub event_id: DbId,
    pub event_title: String,
    pub event_start_date_time: LocalDateTime,
    pub event_end_date_time: LocalDateTime,
    pub number_of_participants: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

/// An admin verdict on a pending event or auditorium request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Decision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            rejection_reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            rejection_reason: Some(reason.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Childcare
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieSession {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub registered_count: i32,
    pub available_places: i32,
    pub price_per_child: f64,
    pub status: String,
    pub event_id: Option<DbId>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieSessionForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub price_per_child: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieBookingRequest {
    pub session_id: DbId,
    pub number_of_children: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieReservation {
    pub id: DbId,
    pub session_id: DbId,
    pub session_title: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub number_of_children: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Back office
// ---------------------------------------------------------------------------

/// One row of the merged bookings table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBooking {
    pub id: DbId,
    /// `ESPACE`, `EVENT` or `GARDERIE`.
    #[serde(rename = "type")]
    pub kind: String,
    pub type_name: String,
    pub user_id: DbId,
    pub user_full_name: String,
    pub user_email: String,
    pub item_name: String,
    pub date_info: String,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub payment_intent_id: Option<String>,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSpaceReservation {
    pub id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub espace_name: String,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventRegistration {
    pub id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub event_title: String,
    pub event_date: LocalDateTime,
    pub number_of_participants: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGarderieReservation {
    pub id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub session_title: String,
    pub session_date: NaiveDate,
    pub number_of_children: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: i64,
    pub total_espaces: i64,
    pub total_events: i64,
    pub total_garderie_sessions: i64,
    pub confirmed_space_reservations: i64,
    pub cancelled_space_reservations: i64,
    pub pending_space_reservations: i64,
    pub space_revenue: f64,
    pub confirmed_event_registrations: i64,
    pub cancelled_event_registrations: i64,
    pub event_revenue: f64,
    pub confirmed_garderie_reservations: i64,
    pub cancelled_garderie_reservations: i64,
    pub garderie_revenue: f64,
    pub total_revenue: f64,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// Body of `create-payment-intent`. The service recomputes the amount.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    /// Amount in cents as computed by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reservation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub espace_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_participants: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_children: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: Option<String>,
    pub public_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCheck {
    pub status: String,
    pub success: bool,
    pub payment_intent_id: Option<String>,
    pub error: Option<String>,
}
