//! Admin event management (`/admin/events`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::approval::{decide_event, Decision};
use cercle_core::status::EventStatus;
use cercle_core::types::DbId;
use cercle_db::models::event::{CreateEvent, Event};
use cercle_db::repositories::EventRepo;
use serde::Deserialize;

use super::event_input::{self, EventRequest};
use super::parse_status;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{map_all, EventResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

/// GET /api/admin/events
pub async fn list_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = EventRepo::list_all(&state.pool).await?;
    Ok(Json(map_all(&events)))
}

/// GET /api/admin/events/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = EventRepo::list_by_status(&state.pool, EventStatus::PendingApproval).await?;
    Ok(Json(map_all(&events)))
}

/// GET /api/admin/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<EventResponse>> {
    let event = find_event(&state, id).await?;
    Ok(Json(EventResponse::from(&event)))
}

/// POST /api/admin/events
///
/// Admin events skip approval and are published immediately.
pub async fn create_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<EventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let planned = event_input::plan(&state, &input, None).await?;
    let event = EventRepo::create(
        &state.pool,
        &CreateEvent {
            fields: planned.fields,
            status: EventStatus::Published.as_str().to_string(),
            created_by: admin.user_id,
            approved_by: Some(admin.user_id),
        },
        planned.garderie.as_ref(),
    )
    .await?;

    tracing::info!(admin_id = admin.user_id, event_id = event.id, "Event created by admin");
    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}

/// PUT /api/admin/events/{id}
///
/// Full edit. The status is kept unless the body carries one.
pub async fn update_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<EventRequest>,
) -> AppResult<Json<EventResponse>> {
    let current = find_event(&state, id).await?;
    let status = match input.status {
        Some(status) => status,
        None => parse_status(&current.status)?,
    };
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

    tracing::info!(admin_id = admin.user_id, event_id = id, "Event updated by admin");
    Ok(Json(EventResponse::from(&event)))
}

/// DELETE /api/admin/events/{id}
///
/// Registrations and the linked childcare session go with the event.
pub async fn delete_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EventRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Événement", id));
    }
    tracing::info!(admin_id = admin.user_id, event_id = id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/events/{id}/approve
///
/// Body `{approved, rejectionReason}`. Only pending events can be decided.
pub async fn decide(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(decision): Json<Decision>,
) -> AppResult<Json<EventResponse>> {
    let event = find_event(&state, id).await?;
    let outcome = decide_event(parse_status(&event.status)?, &decision)?;

    let event = EventRepo::record_decision(
        &state.pool,
        id,
        outcome.status,
        admin.user_id,
        outcome.rejection_reason.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::validation("Cet événement n'est pas en attente d'approbation"))?;

    tracing::info!(
        admin_id = admin.user_id,
        event_id = id,
        status = %outcome.status,
        "Event decision recorded"
    );
    Ok(Json(EventResponse::from(&event)))
}

/// PATCH /api/admin/events/{id}/status?status=
///
/// Force any valid status, case-insensitive.
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<EventResponse>> {
    let status: EventStatus = params
        .status
        .trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(|_| AppError::validation("Statut invalide"))?;

    let event = EventRepo::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Événement", id))?;

    tracing::info!(admin_id = admin.user_id, event_id = id, status = %status, "Event status forced");
    Ok(Json(EventResponse::from(&event)))
}

async fn find_event(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Événement", id))
}
