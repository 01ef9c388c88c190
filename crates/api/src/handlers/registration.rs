//! Event registrations (`/public/events/register`, `/public/events/registrations`).
//!
//! A registration may carry a childcare add-on booked on the event's linked
//! session. Both rows are written in one transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::approval::check_booking_cancellable;
use cercle_core::error::CoreError;
use cercle_core::event_planning::fits_capacity;
use cercle_core::pricing;
use cercle_core::status::{BookingStatus, EventStatus, GarderieSessionStatus};
use cercle_core::types::DbId;
use cercle_db::models::garderie::CreateGarderieReservation;
use cercle_db::models::registration::{CreateRegistration, RegistrationOutcome};
use cercle_db::repositories::{EventRegistrationRepo, EventRepo, GarderieSessionRepo};
use serde::Deserialize;
use validator::Validate;

use super::local_now;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{map_all, RegistrationResponse};
use crate::state::AppState;

/// Request body for `POST /public/events/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEventRequest {
    pub event_id: DbId,
    #[serde(default = "one")]
    #[validate(range(min = 1, max = 100, message = "Nombre de participants invalide"))]
    pub number_of_participants: i32,
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub add_childcare: bool,
    #[validate(range(min = 0, max = 100, message = "Nombre d'enfants invalide"))]
    pub number_of_children: Option<i32>,
}

fn one() -> i32 {
    1
}

/// POST /api/public/events/register
///
/// Register the caller to a published, upcoming event. A payment is
/// required when the event price plus childcare is above zero.
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RegisterEventRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    input.validate()?;
    let event = EventRepo::find_by_id(&state.pool, input.event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Événement", input.event_id))?;

    if event.status != EventStatus::Published.as_str() {
        return Err(AppError::validation(
            "Cet événement n'est pas ouvert aux inscriptions",
        ));
    }
    if event.start_date_time < local_now() {
        return Err(AppError::validation("Cet événement est déjà passé"));
    }
    if EventRegistrationRepo::exists_active_for_user(&state.pool, user.user_id, event.id).await? {
        return Err(AppError::validation("Vous êtes déjà inscrit à cet événement"));
    }
    if !fits_capacity(
        event.capacity,
        i64::from(event.registered_count),
        input.number_of_participants,
    ) {
        return Err(AppError::validation("Capacité maximale atteinte"));
    }

    // Childcare is only booked when the event offers an open session.
    let session = match (input.add_childcare, event.garderie_session_id) {
        (true, Some(session_id)) => GarderieSessionRepo::find_by_id(&state.pool, session_id).await?,
        _ => None,
    };
    let children = match &session {
        Some(session) => {
            let children = input.number_of_children.unwrap_or(0);
            if children <= 0 {
                return Err(AppError::validation("Nombre d'enfants invalide"));
            }
            if session.status != GarderieSessionStatus::Open.as_str() {
                return Err(AppError::validation(
                    "La garderie n'est pas disponible pour cet événement",
                ));
            }
            if children > session.available_places() {
                return Err(childcare_full(session.available_places()));
            }
            children
        }
        None => 0,
    };

    let event_price = pricing::event_price(event.price_cents, input.number_of_participants);
    let garderie_price = session
        .as_ref()
        .map(|s| pricing::garderie_price(s.price_per_child_cents, children))
        .unwrap_or(0);

    let payment_intent_id = input
        .payment_intent_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    if event_price + garderie_price > 0 {
        state.payments.verify(payment_intent_id).await?;
    }

    let childcare = session.map(|s| CreateGarderieReservation {
        user_id: user.user_id,
        session_id: s.id,
        number_of_children: children,
        total_price_cents: garderie_price,
        payment_intent_id: payment_intent_id.map(str::to_string),
    });

    let outcome = EventRegistrationRepo::create(
        &state.pool,
        &CreateRegistration {
            user_id: user.user_id,
            event_id: event.id,
            number_of_participants: input.number_of_participants,
            total_price_cents: event_price,
            payment_intent_id: payment_intent_id.map(str::to_string),
            childcare,
        },
    )
    .await?;

    let registration = match outcome {
        RegistrationOutcome::Created(registration) => registration,
        RegistrationOutcome::EventFull => {
            return Err(AppError::validation("Capacité maximale atteinte"))
        }
        RegistrationOutcome::ChildcareFull { remaining } => return Err(childcare_full(remaining)),
    };

    tracing::info!(
        user_id = user.user_id,
        event_id = event.id,
        registration_id = registration.id,
        children,
        "Event registration created"
    );
    let detail = EventRegistrationRepo::find_detail(&state.pool, registration.id)
        .await?
        .ok_or_else(|| AppError::not_found("Inscription", registration.id))?;
    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(&detail))))
}

/// GET /api/public/events/registrations/me
pub async fn my_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<RegistrationResponse>>> {
    let rows = EventRegistrationRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(map_all(&rows)))
}

/// DELETE /api/public/events/registrations/{id}/cancel
pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let registration = EventRegistrationRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Inscription", id))?;

    if registration.user_id != user.user_id {
        return Err(AppError::forbidden(
            "Vous ne pouvez pas annuler cette inscription",
        ));
    }
    check_booking_cancellable(
        registration.status == BookingStatus::Cancelled.as_str(),
        registration.event_start_date_time,
        local_now(),
    )?;

    EventRegistrationRepo::cancel(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, registration_id = id, "Event registration cancelled");
    Ok(StatusCode::NO_CONTENT)
}

fn childcare_full(remaining: i32) -> AppError {
    AppError::Core(CoreError::validation(format!(
        "Capacité garderie insuffisante. Places restantes : {remaining}"
    )))
}
