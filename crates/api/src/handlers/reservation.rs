//! Handlers for space reservations (`/public/reservations`).
//!
//! Standard spaces are paid up front and stored `CONFIRMED`. Auditoriums go
//! through a request (`PENDING_APPROVAL`), an admin decision (`APPROVED`)
//! and then payment (`CONFIRMED`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::approval::{check_payable, check_reservation_cancellable};
use cercle_core::availability::{self, DayStatus, HourSlot, Interval};
use cercle_core::pricing::{euros_to_cents, space_price};
use cercle_core::status::{EspaceStatus, EspaceType, ReservationStatus};
use cercle_core::types::{DbId, LocalDateTime};
use cercle_db::models::espace::Espace;
use cercle_db::models::reservation::{CalendarEntry, CreateReservation};
use cercle_db::repositories::{EspaceRepo, ReservationRepo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{local_now, parse_status};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{map_all, ReservationResponse};
use crate::state::AppState;

/// Largest accepted gap, in cents, between the client's total and ours.
const PRICE_TOLERANCE_CENTS: i64 = 1;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /public/reservations`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    /// Total shown to the user, in euros. Checked against the server price.
    pub total_price: Option<f64>,
    #[validate(length(min = 1, message = "Paiement manquant"))]
    pub payment_intent_id: String,
}

/// Request body for `POST /public/reservations/auditorium`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuditoriumReservationRequest {
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
    pub total_price: Option<f64>,
    #[serde(default)]
    pub justification: String,
}

/// Request body for `POST /public/reservations/{id}/pay`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayReservationRequest {
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub espace_id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct DaySlotsParams {
    pub date: NaiveDate,
}

/// One booked interval on the public calendar.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarReservation {
    pub id: DbId,
    pub start_date_time: LocalDateTime,
    pub end_date_time: LocalDateTime,
}

impl From<&CalendarEntry> for CalendarReservation {
    fn from(entry: &CalendarEntry) -> Self {
        Self {
            id: entry.id,
            start_date_time: entry.start_date_time,
            end_date_time: entry.end_date_time,
        }
    }
}

/// Hour grid of one day for one space.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlotsResponse {
    pub espace_id: DbId,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub slots: Vec<HourSlot>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/public/reservations
///
/// Book a standard (non-auditorium) space. The payment must be settled and
/// the slot free; the insert and the overlap check share one transaction.
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    input.validate()?;
    let espace = find_espace(&state, input.espace_id).await?;
    if is_auditorium(&espace) {
        return Err(AppError::validation(
            "Les auditoires doivent être réservés via l'endpoint /auditorium",
        ));
    }

    let total_price_cents = priced_booking(
        &espace,
        input.start_date_time,
        input.end_date_time,
        input.total_price,
    )?;
    state.payments.verify(Some(&input.payment_intent_id)).await?;

    let reservation = ReservationRepo::create_if_free(
        &state.pool,
        &CreateReservation {
            user_id: user.user_id,
            espace_id: espace.id,
            start_date_time: input.start_date_time,
            end_date_time: input.end_date_time,
            total_price_cents,
            status: ReservationStatus::Confirmed.as_str().to_string(),
            payment_intent_id: Some(input.payment_intent_id.trim().to_string()),
            justification: None,
        },
    )
    .await?
    .ok_or_else(slot_taken)?;

    tracing::info!(
        user_id = user.user_id,
        espace_id = espace.id,
        reservation_id = reservation.id,
        "Space reserved"
    );
    detail_response(&state, reservation.id)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

/// POST /api/public/reservations/auditorium
///
/// Request an auditorium. Stored `PENDING_APPROVAL`; no payment yet.
pub async fn request_auditorium(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AuditoriumReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let justification = input.justification.trim();
    if justification.is_empty() {
        return Err(AppError::validation(
            "Une justification est requise pour réserver un auditoire",
        ));
    }

    let espace = find_espace(&state, input.espace_id).await?;
    if !is_auditorium(&espace) {
        return Err(AppError::validation(
            "Cet espace n'est pas un auditoire. Utilisez l'endpoint standard pour les salles.",
        ));
    }

    let total_price_cents = priced_booking(
        &espace,
        input.start_date_time,
        input.end_date_time,
        input.total_price,
    )?;

    let reservation = ReservationRepo::create_if_free(
        &state.pool,
        &CreateReservation {
            user_id: user.user_id,
            espace_id: espace.id,
            start_date_time: input.start_date_time,
            end_date_time: input.end_date_time,
            total_price_cents,
            status: ReservationStatus::PendingApproval.as_str().to_string(),
            payment_intent_id: None,
            justification: Some(justification.to_string()),
        },
    )
    .await?
    .ok_or_else(slot_taken)?;

    tracing::info!(
        user_id = user.user_id,
        espace_id = espace.id,
        reservation_id = reservation.id,
        "Auditorium requested"
    );
    detail_response(&state, reservation.id)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

/// POST /api/public/reservations/{id}/pay
///
/// Pay an approved auditorium reservation, which confirms it.
pub async fn pay_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PayReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation", id))?;

    if reservation.user_id != user.user_id {
        return Err(AppError::forbidden("Vous ne pouvez pas payer cette réservation"));
    }
    check_payable(parse_status(&reservation.status)?)?;

    let payment_intent_id = input.payment_intent_id.as_deref().map(str::trim);
    state.payments.verify(payment_intent_id).await?;

    // The guarded update also catches a concurrent status change.
    ReservationRepo::confirm_payment(&state.pool, id, payment_intent_id.unwrap_or_default())
        .await?
        .ok_or_else(|| AppError::validation("Cette réservation n'est pas en attente de paiement"))?;

    tracing::info!(user_id = user.user_id, reservation_id = id, "Auditorium reservation paid");
    detail_response(&state, id).await.map(Json)
}

/// GET /api/public/reservations/me
pub async fn my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let rows = ReservationRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/public/reservations/user/{userId}
///
/// A user's reservations; visible to that user and to admins.
pub async fn user_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    if user.user_id != user_id && !user.is_admin() {
        return Err(AppError::forbidden("Accès refusé"));
    }
    cercle_db::repositories::UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur", user_id))?;

    let rows = ReservationRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/public/reservations/check-availability
///
/// `true` when no blocking reservation overlaps the requested interval.
pub async fn check_availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<bool>> {
    if params.end_date_time <= params.start_date_time {
        return Err(AppError::validation(
            "La date de fin doit être après la date de début",
        ));
    }
    let taken = ReservationRepo::exists_overlapping(
        &state.pool,
        params.espace_id,
        params.start_date_time,
        params.end_date_time,
    )
    .await?;
    Ok(Json(!taken))
}

/// GET /api/public/reservations/espace/{id}/calendar
///
/// Confirmed reservations of one space during `year`/`month`.
pub async fn espace_calendar(
    State(state): State<AppState>,
    Path(espace_id): Path<DbId>,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<Vec<CalendarReservation>>> {
    find_espace(&state, espace_id).await?;
    let (from, to) = availability::month_bounds(params.year, params.month)?;
    let rows = ReservationRepo::list_confirmed_in_period(&state.pool, espace_id, from, to).await?;
    Ok(Json(map_all(&rows)))
}

/// GET /api/public/reservations/espace/{id}/day-slots
///
/// Hour grid of `date`, counting every reservation that holds its slot.
pub async fn espace_day_slots(
    State(state): State<AppState>,
    Path(espace_id): Path<DbId>,
    Query(params): Query<DaySlotsParams>,
) -> AppResult<Json<DaySlotsResponse>> {
    find_espace(&state, espace_id).await?;
    let from = params.date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let to = params.date.and_hms_opt(23, 59, 59).unwrap_or_default();

    let booked: Vec<Interval> =
        ReservationRepo::list_blocking_in_period(&state.pool, espace_id, from, to)
            .await?
            .iter()
            .map(|e| Interval::new(e.start_date_time, e.end_date_time))
            .collect();

    Ok(Json(DaySlotsResponse {
        espace_id,
        date: params.date,
        status: availability::day_status(params.date, &booked),
        slots: availability::hour_slots(params.date, &booked),
    }))
}

/// DELETE /api/public/reservations/{id}/cancel
///
/// Cancel one of the caller's upcoming reservations. Returns 204.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let reservation = ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation", id))?;

    if reservation.user_id != user.user_id {
        return Err(AppError::forbidden("Vous ne pouvez pas annuler cette réservation"));
    }
    check_reservation_cancellable(
        parse_status(&reservation.status)?,
        reservation.start_date_time,
        local_now(),
    )?;

    ReservationRepo::cancel(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, reservation_id = id, "Reservation cancelled");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_espace(state: &AppState, id: DbId) -> AppResult<Espace> {
    EspaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Espace", id))
}

fn is_auditorium(espace: &Espace) -> bool {
    espace.espace_type.as_deref() == Some(EspaceType::Auditoire.as_str())
}

/// Check bookability and compute the server price of a booking.
///
/// When the client sent a total, it must match the server price.
fn priced_booking(
    espace: &Espace,
    start: LocalDateTime,
    end: LocalDateTime,
    client_total: Option<f64>,
) -> AppResult<i64> {
    if espace.status != EspaceStatus::Available.as_str() {
        return Err(AppError::validation("Espace non disponible"));
    }
    if start < local_now() {
        return Err(AppError::validation(
            "La date de début ne peut pas être dans le passé",
        ));
    }
    let price = space_price(espace.base_price_cents, start, end)?;
    if let Some(total) = client_total {
        if (euros_to_cents(total) - price).abs() > PRICE_TOLERANCE_CENTS {
            return Err(AppError::validation("Montant invalide"));
        }
    }
    Ok(price)
}

fn slot_taken() -> AppError {
    AppError::Core(cercle_core::error::CoreError::conflict(
        "Cet espace est déjà réservé pour cette période. Veuillez choisir un autre créneau.",
    ))
}

async fn detail_response(state: &AppState, id: DbId) -> AppResult<ReservationResponse> {
    let detail = ReservationRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation", id))?;
    Ok(ReservationResponse::from(&detail))
}
