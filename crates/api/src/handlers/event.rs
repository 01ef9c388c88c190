//! Public event catalogue (`/public/events`).

use axum::extract::{Path, State};
use axum::Json;
use cercle_core::status::EventStatus;
use cercle_core::types::DbId;
use cercle_db::repositories::EventRepo;

use super::local_now;
use crate::error::{AppError, AppResult};
use crate::response::{map_all, EventResponse};
use crate::state::AppState;

/// GET /api/public/events
///
/// Published events that have not started yet, soonest first.
pub async fn list_published(State(state): State<AppState>) -> AppResult<Json<Vec<EventResponse>>> {
    let events = EventRepo::list_published_upcoming(&state.pool, local_now()).await?;
    Ok(Json(map_all(&events)))
}

/// GET /api/public/events/{id}
///
/// Unpublished events are reported as missing.
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EventResponse>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|e| e.status == EventStatus::Published.as_str())
        .ok_or_else(|| AppError::not_found("Événement", id))?;
    Ok(Json(EventResponse::from(&event)))
}
