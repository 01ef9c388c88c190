//! JSON response bodies shared by several handler modules.
//!
//! Field names are camelCase and money is decimal euros, which is the
//! contract the browser front end consumes. Each type converts from the
//! matching `cercle_db` row.

use cercle_core::pricing::cents_to_euros;
use cercle_core::types::{DbId, LocalDateTime, Timestamp};
use cercle_db::models::espace::Espace;
use cercle_db::models::event::Event;
use cercle_db::models::garderie::{GarderieReservationDetail, GarderieSession};
use cercle_db::models::registration::RegistrationDetail;
use cercle_db::models::reservation::ReservationDetail;
use cercle_db::models::user::User;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
            created_at: user.created_at,
            updated_at: Some(user.updated_at),
        }
    }
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EspaceResponse {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub espace_type: Option<String>,
    pub capacity: Option<i32>,
    /// Hourly price in euros.
    pub base_price: f64,
    pub status: String,
}

impl From<&Espace> for EspaceResponse {
    fn from(espace: &Espace) -> Self {
        Self {
            id: espace.id,
            name: espace.name.clone(),
            espace_type: espace.espace_type.clone(),
            capacity: espace.capacity,
            base_price: cents_to_euros(espace.base_price_cents),
            status: espace.status.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: DbId,
    pub user: UserResponse,
    pub espace: EspaceResponse,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price: f64,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub justification: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
}

impl From<&ReservationDetail> for ReservationResponse {
    fn from(r: &ReservationDetail) -> Self {
        Self {
            id: r.id,
            user: UserResponse {
                id: r.user_id,
                first_name: r.user_first_name.clone(),
                last_name: r.user_last_name.clone(),
                email: r.user_email.clone(),
                role: r.user_role.clone(),
                status: r.user_status.clone(),
                created_at: r.user_created_at,
                updated_at: None,
            },
            espace: EspaceResponse {
                id: r.espace_id,
                name: r.espace_name.clone(),
                espace_type: r.espace_type.clone(),
                capacity: r.espace_capacity,
                base_price: cents_to_euros(r.espace_base_price_cents),
                status: r.espace_status.clone(),
            },
            start_date_time: r.start_date_time,
            end_date_time: r.end_date_time,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            payment_intent_id: r.payment_intent_id.clone(),
            justification: r.justification.clone(),
            approved_at: r.approved_at,
            rejection_reason: r.rejection_reason.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    /// Display location: the label, else the external address.
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
    pub created_by_id: Option<DbId>,
    pub created_by_name: Option<String>,
    pub created_at: Timestamp,
    pub approved_at: Option<Timestamp>,
    pub approved_by_name: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<&Event> for EventResponse {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            title: e.title.clone(),
            description: e.description.clone(),
            start_date_time: e.start_date_time,
            end_date_time: e.end_date_time,
            location: e.location.clone().or_else(|| e.external_address.clone()),
            location_type: e.location_type.clone(),
            space_id: e.space_id,
            external_address: e.external_address.clone(),
            capacity: e.capacity,
            price: e.price_cents.map(cents_to_euros),
            min_age: e.min_age,
            max_age: e.max_age,
            status: e.status.clone(),
            registered_count: e.registered_count,
            available_places: (e.capacity - e.registered_count).max(0),
            garderie_required: e.garderie_required,
            garderie_session_id: e.garderie_session_id,
            created_by_id: e.created_by,
            created_by_name: e.created_by_name.clone(),
            created_at: e.created_at,
            approved_at: e.approved_at,
            approved_by_name: e.approved_by_name.clone(),
            rejection_reason: e.rejection_reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
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

impl From<&RegistrationDetail> for RegistrationResponse {
    fn from(r: &RegistrationDetail) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            event_title: r.event_title.clone(),
            event_start_date_time: r.event_start_date_time,
            event_end_date_time: r.event_end_date_time,
            number_of_participants: r.number_of_participants,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieSessionResponse {
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
    pub created_at: Timestamp,
}

impl From<&GarderieSession> for GarderieSessionResponse {
    fn from(s: &GarderieSession) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            description: s.description.clone(),
            session_date: s.session_date,
            start_time: s.start_time,
            end_time: s.end_time,
            capacity: s.capacity,
            registered_count: s.registered_count,
            available_places: s.available_places(),
            price_per_child: cents_to_euros(s.price_per_child_cents),
            status: s.status.clone(),
            event_id: s.event_id,
            min_age: s.min_age,
            max_age: s.max_age,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarderieReservationResponse {
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

impl From<&GarderieReservationDetail> for GarderieReservationResponse {
    fn from(r: &GarderieReservationDetail) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            session_title: r.session_title.clone(),
            session_date: r.session_date,
            start_time: r.start_time,
            end_time: r.end_time,
            number_of_children: r.number_of_children,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            created_at: r.created_at,
        }
    }
}

/// Map a slice of rows through the row's `From` conversion.
pub fn map_all<'a, R: 'a, T: From<&'a R>>(rows: &'a [R]) -> Vec<T> {
    rows.iter().map(T::from).collect()
}
