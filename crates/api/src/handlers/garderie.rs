//! Public childcare sessions and bookings (`/public/garderie`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::approval::check_booking_cancellable;
use cercle_core::pricing;
use cercle_core::status::{BookingStatus, GarderieSessionStatus};
use cercle_core::types::DbId;
use cercle_db::models::garderie::{CreateGarderieReservation, GarderieBookingOutcome};
use cercle_db::repositories::{GarderieReservationRepo, GarderieSessionRepo};
use serde::Deserialize;
use validator::Validate;

use super::local_now;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{map_all, GarderieReservationResponse, GarderieSessionResponse};
use crate::state::AppState;

/// Request body for `POST /public/garderie/reservations`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GarderieBookingRequest {
    pub session_id: DbId,
    #[validate(range(min = 1, max = 100, message = "Nombre d'enfants invalide"))]
    pub number_of_children: i32,
    pub payment_intent_id: Option<String>,
}

/// GET /api/public/garderie/sessions
///
/// Open sessions dated today or later.
pub async fn list_open_sessions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GarderieSessionResponse>>> {
    let sessions = GarderieSessionRepo::list_open_upcoming(&state.pool, local_now().date()).await?;
    Ok(Json(map_all(&sessions)))
}

/// POST /api/public/garderie/reservations
///
/// Book places in an open session. The payment is verified before the
/// capacity-checked insert.
pub async fn reserve(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GarderieBookingRequest>,
) -> AppResult<(StatusCode, Json<GarderieReservationResponse>)> {
    input.validate()?;
    let session = GarderieSessionRepo::find_by_id(&state.pool, input.session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session", input.session_id))?;

    if session.status != GarderieSessionStatus::Open.as_str() {
        return Err(AppError::validation("Session non ouverte à la réservation"));
    }
    if session.session_date.and_time(session.start_time) < local_now() {
        return Err(AppError::validation("Cette session est déjà passée"));
    }

    state.payments.verify(input.payment_intent_id.as_deref()).await?;

    let outcome = GarderieReservationRepo::create(
        &state.pool,
        &CreateGarderieReservation {
            user_id: user.user_id,
            session_id: session.id,
            number_of_children: input.number_of_children,
            total_price_cents: pricing::garderie_price(
                session.price_per_child_cents,
                input.number_of_children,
            ),
            payment_intent_id: input.payment_intent_id.as_deref().map(|s| s.trim().to_string()),
        },
    )
    .await?;

    let reservation = match outcome {
        GarderieBookingOutcome::Created(reservation) => reservation,
        GarderieBookingOutcome::Full { remaining } => {
            return Err(AppError::validation(format!(
                "Capacité insuffisante. Places restantes : {remaining}"
            )))
        }
    };

    tracing::info!(
        user_id = user.user_id,
        session_id = session.id,
        reservation_id = reservation.id,
        "Childcare booked"
    );
    let detail = GarderieReservationRepo::find_detail(&state.pool, reservation.id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation garderie", reservation.id))?;
    Ok((StatusCode::CREATED, Json(GarderieReservationResponse::from(&detail))))
}

/// GET /api/public/garderie/reservations/me
pub async fn my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<GarderieReservationResponse>>> {
    let rows = GarderieReservationRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(map_all(&rows)))
}

/// DELETE /api/public/garderie/reservations/{id}/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let reservation = GarderieReservationRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Réservation garderie", id))?;

    if reservation.user_id != user.user_id {
        return Err(AppError::forbidden(
            "Vous ne pouvez pas annuler cette réservation",
        ));
    }
    check_booking_cancellable(
        reservation.status == BookingStatus::Cancelled.as_str(),
        reservation.session_date.and_time(reservation.start_time),
        local_now(),
    )?;

    GarderieReservationRepo::cancel(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, reservation_id = id, "Childcare booking cancelled");
    Ok(StatusCode::NO_CONTENT)
}
