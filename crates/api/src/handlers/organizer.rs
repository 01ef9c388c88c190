//! Organizer event submissions (`/organizer/events`).
//!
//! Organizers submit events that wait for an admin decision. Admins may use
//! the same endpoints; their events are published at once.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::approval::{initial_event_status, status_after_organizer_edit};
use cercle_core::status::EventStatus;
use cercle_core::types::DbId;
use cercle_db::models::event::{CreateEvent, Event};
use cercle_db::repositories::EventRepo;

use super::event_input::{self, EventRequest};
use super::parse_status;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOrganizer;
use crate::response::{map_all, EventResponse};
use crate::state::AppState;

/// POST /api/organizer/events
pub async fn create_event(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    Json(input): Json<EventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let planned = event_input::plan(&state, &input, None).await?;
    let status = initial_event_status(user.is_admin());

    let event = EventRepo::create(
        &state.pool,
        &CreateEvent {
            fields: planned.fields,
            status: status.as_str().to_string(),
            created_by: user.user_id,
            approved_by: user.is_admin().then_some(user.user_id),
        },
        planned.garderie.as_ref(),
    )
    .await?;

    tracing::info!(user_id = user.user_id, event_id = event.id, status = %status, "Event submitted");
    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}

/// GET /api/organizer/events/my
///
/// The caller's events, newest first. Open to any signed-in user.
pub async fn my_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = EventRepo::list_by_creator(&state.pool, user.user_id).await?;
    Ok(Json(map_all(&events)))
}

/// GET /api/organizer/events/my/{id}
pub async fn my_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<EventResponse>> {
    let event = owned_event(&state, &user, id).await?;
    Ok(Json(EventResponse::from(&event)))
}

/// PUT /api/organizer/events/my/{id}
///
/// Edit a pending or rejected event. The edit resubmits it for approval.
pub async fn update_my_event(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    Path(id): Path<DbId>,
    Json(input): Json<EventRequest>,
) -> AppResult<Json<EventResponse>> {
    let event = owned_event(&state, &user, id).await?;
    let status = status_after_organizer_edit(parse_status(&event.status)?)?;
    let planned = event_input::plan(&state, &input, Some(id)).await?;

    let event = EventRepo::update(
        &state.pool,
        id,
        &planned.fields,
        status,
        planned.garderie.as_ref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Événement", id))?;

    tracing::info!(user_id = user.user_id, event_id = id, "Event resubmitted");
    Ok(Json(EventResponse::from(&event)))
}

/// DELETE /api/organizer/events/my/{id}
///
/// Organizers cannot delete; the event is cancelled instead.
pub async fn cancel_my_event(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_event(&state, &user, id).await?;
    EventRepo::set_status(&state.pool, id, EventStatus::Cancelled).await?;
    tracing::info!(user_id = user.user_id, event_id = id, "Event cancelled by organizer");
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_event(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Événement", id))?;
    if event.created_by != Some(user.user_id) {
        return Err(AppError::forbidden(
            "Vous n'êtes pas le créateur de cet événement",
        ));
    }
    Ok(event)
}
