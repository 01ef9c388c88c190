//! Public space listing (`/public/espaces`).

use axum::extract::State;
use axum::Json;
use cercle_core::status::EspaceStatus;
use cercle_db::repositories::EspaceRepo;

use crate::error::AppResult;
use crate::response::{map_all, EspaceResponse};
use crate::state::AppState;

/// GET /api/public/espaces
///
/// Spaces that can currently be booked.
pub async fn list_available(State(state): State<AppState>) -> AppResult<Json<Vec<EspaceResponse>>> {
    let espaces = EspaceRepo::list_by_status(&state.pool, EspaceStatus::Available.as_str()).await?;
    Ok(Json(map_all(&espaces)))
}
