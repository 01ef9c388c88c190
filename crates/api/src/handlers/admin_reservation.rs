//! Admin view over every kind of booking (`/admin/reservations`).
//!
//! Space reservations, event registrations and childcare bookings are
//! listed either in their own detailed shape or in one unified row format.

use axum::extract::{Path, State};
use axum::Json;
use cercle_core::approval::{decide_reservation, Decision};
use cercle_core::pricing::cents_to_euros;
use cercle_core::types::{DbId, LocalDateTime, Timestamp};
use cercle_db::models::garderie::GarderieReservationDetail;
use cercle_db::models::registration::RegistrationDetail;
use cercle_db::models::reservation::ReservationDetail;
use cercle_db::repositories::{
    EventRegistrationRepo, GarderieReservationRepo, ReservationRepo,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::parse_status;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{map_all, ReservationResponse};
use crate::state::AppState;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Which table a unified row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingKind {
    Espace,
    Event,
    Garderie,
}

impl BookingKind {
    fn label(self) -> &'static str {
        match self {
            BookingKind::Espace => "Espace",
            BookingKind::Event => "Événement",
            BookingKind::Garderie => "Garderie",
        }
    }
}

/// One booking of any kind, for the combined admin table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingRow {
    pub id: DbId,
    #[serde(rename = "type")]
    pub kind: BookingKind,
    pub type_name: &'static str,
    pub user_id: DbId,
    pub user_full_name: String,
    pub user_email: String,
    pub item_name: String,
    pub date_info: String,
    /// Hours, participants or children depending on the kind.
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub payment_intent_id: Option<String>,
    pub paid: bool,
}

impl AdminBookingRow {
    #[allow(clippy::too_many_arguments)]
    fn new(
        kind: BookingKind,
        id: DbId,
        user: (DbId, &str, &str, &str),
        item_name: &str,
        date_info: String,
        quantity: i32,
        total_price_cents: i64,
        status: &str,
        created_at: Timestamp,
        payment_intent_id: &Option<String>,
    ) -> Self {
        let (user_id, first_name, last_name, email) = user;
        Self {
            id,
            kind,
            type_name: kind.label(),
            user_id,
            user_full_name: format!("{first_name} {last_name}"),
            user_email: email.to_string(),
            item_name: item_name.to_string(),
            date_info,
            quantity,
            total_price: cents_to_euros(total_price_cents),
            status: status.to_string(),
            created_at,
            payment_intent_id: payment_intent_id.clone(),
            paid: payment_intent_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty()),
        }
    }
}

impl From<&ReservationDetail> for AdminBookingRow {
    fn from(r: &ReservationDetail) -> Self {
        let hours = (r.end_date_time - r.start_date_time).num_hours();
        Self::new(
            BookingKind::Espace,
            r.id,
            (r.user_id, &r.user_first_name, &r.user_last_name, &r.user_email),
            &r.espace_name,
            format!(
                "{} → {}",
                r.start_date_time.format(DATE_TIME_FORMAT),
                r.end_date_time.format(DATE_TIME_FORMAT)
            ),
            i32::try_from(hours).unwrap_or(i32::MAX),
            r.total_price_cents,
            &r.status,
            r.created_at,
            &r.payment_intent_id,
        )
    }
}

impl From<&RegistrationDetail> for AdminBookingRow {
    fn from(r: &RegistrationDetail) -> Self {
        Self::new(
            BookingKind::Event,
            r.id,
            (r.user_id, &r.user_first_name, &r.user_last_name, &r.user_email),
            &r.event_title,
            r.event_start_date_time.format(DATE_TIME_FORMAT).to_string(),
            r.number_of_participants,
            r.total_price_cents,
            &r.status,
            r.created_at,
            &r.payment_intent_id,
        )
    }
}

impl From<&GarderieReservationDetail> for AdminBookingRow {
    fn from(r: &GarderieReservationDetail) -> Self {
        Self::new(
            BookingKind::Garderie,
            r.id,
            (r.user_id, &r.user_first_name, &r.user_last_name, &r.user_email),
            &r.session_title,
            format!(
                "{} {}-{}",
                r.session_date,
                r.start_time.format("%H:%M"),
                r.end_time.format("%H:%M")
            ),
            r.number_of_children,
            r.total_price_cents,
            &r.status,
            r.created_at,
            &r.payment_intent_id,
        )
    }
}

#[derive(Debug, Serialize)]
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

impl From<&ReservationDetail> for AdminSpaceReservation {
    fn from(r: &ReservationDetail) -> Self {
        Self {
            id: r.id,
            user_name: format!("{} {}", r.user_first_name, r.user_last_name),
            user_email: r.user_email.clone(),
            espace_name: r.espace_name.clone(),
            start_date_time: r.start_date_time,
            end_date_time: r.end_date_time,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
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

impl From<&RegistrationDetail> for AdminEventRegistration {
    fn from(r: &RegistrationDetail) -> Self {
        Self {
            id: r.id,
            user_name: format!("{} {}", r.user_first_name, r.user_last_name),
            user_email: r.user_email.clone(),
            event_title: r.event_title.clone(),
            event_date: r.event_start_date_time,
            number_of_participants: r.number_of_participants,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
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

impl From<&GarderieReservationDetail> for AdminGarderieReservation {
    fn from(r: &GarderieReservationDetail) -> Self {
        Self {
            id: r.id,
            user_name: format!("{} {}", r.user_first_name, r.user_last_name),
            user_email: r.user_email.clone(),
            session_title: r.session_title.clone(),
            session_date: r.session_date,
            number_of_children: r.number_of_children,
            total_price: cents_to_euros(r.total_price_cents),
            status: r.status.clone(),
            created_at: r.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/reservations/all
///
/// Every booking of the three kinds, newest first.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminBookingRow>>> {
    let spaces = ReservationRepo::list_all_detailed(&state.pool).await?;
    let events = EventRegistrationRepo::list_all_detailed(&state.pool).await?;
    let childcare = GarderieReservationRepo::list_all_detailed(&state.pool).await?;

    let mut rows: Vec<AdminBookingRow> = spaces
        .iter()
        .map(AdminBookingRow::from)
        .chain(events.iter().map(AdminBookingRow::from))
        .chain(childcare.iter().map(AdminBookingRow::from))
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(rows))
}

/// GET /api/admin/reservations/spaces
pub async fn list_spaces(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminSpaceReservation>>> {
    let rows = ReservationRepo::list_all_detailed(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/events
pub async fn list_event_registrations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminEventRegistration>>> {
    let rows = EventRegistrationRepo::list_all_detailed(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/childcare
pub async fn list_childcare(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminGarderieReservation>>> {
    let rows = GarderieReservationRepo::list_all_detailed(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/espaces
pub async fn list_spaces_unified(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminBookingRow>>> {
    let rows = ReservationRepo::list_all_detailed(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/garderie
pub async fn list_childcare_unified(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminBookingRow>>> {
    let rows = GarderieReservationRepo::list_all_detailed(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/pending
///
/// Auditorium requests awaiting a decision, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let rows = ReservationRepo::list_pending_approval(&state.pool).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/admin/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReservationResponse>> {
    let detail = find_detail(&state, id).await?;
    Ok(Json(ReservationResponse::from(&detail)))
}

/// POST /api/admin/reservations/{id}/approve
///
/// Approval moves the request to `APPROVED` (awaiting payment). A rejection
/// needs a reason and frees the slot.
pub async fn decide(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(decision): Json<Decision>,
) -> AppResult<Json<ReservationResponse>> {
    let current = find_detail(&state, id).await?;
    let outcome = decide_reservation(parse_status(&current.status)?, &decision)?;

    ReservationRepo::record_decision(
        &state.pool,
        id,
        outcome.status,
        admin.user_id,
        outcome.rejection_reason.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::validation("Cette réservation n'est pas en attente d'approbation"))?;

    tracing::info!(
        admin_id = admin.user_id,
        reservation_id = id,
        status = %outcome.status,
        "Reservation decision recorded"
    );
    let detail = find_detail(&state, id).await?;
    Ok(Json(ReservationResponse::from(&detail)))
}

async fn find_detail(state: &AppState, id: DbId) -> AppResult<ReservationDetail> {
    ReservationRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation", id))
}
