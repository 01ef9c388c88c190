//! Handlers for space management (`/admin/espaces`).
//!
//! All handlers require the `ADMIN` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::event_planning::required_text;
use cercle_core::pricing::euros_to_cents;
use cercle_core::status::{EspaceStatus, EspaceType};
use cercle_core::types::DbId;
use cercle_db::models::espace::EspaceInput;
use cercle_db::repositories::EspaceRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{map_all, EspaceResponse};
use crate::state::AppState;

/// Request body for creating or replacing a space.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EspaceRequest {
    #[validate(length(min = 1, max = 120, message = "Le nom est obligatoire (120 caractères max)"))]
    pub name: String,
    #[serde(rename = "type")]
    pub espace_type: Option<EspaceType>,
    #[validate(range(min = 0, message = "La capacité doit être positive"))]
    pub capacity: Option<i32>,
    /// Hourly price in euros.
    #[validate(range(min = 0.0, message = "Le prix doit être positif"))]
    pub base_price: f64,
    /// Defaults to `AVAILABLE`.
    pub status: Option<EspaceStatus>,
}

impl EspaceRequest {
    fn into_input(self) -> AppResult<EspaceInput> {
        let name = required_text(&self.name, 1, 120, "Le nom est obligatoire (120 caractères max)")?;
        Ok(EspaceInput {
            name,
            espace_type: self.espace_type.map(|t| t.as_str().to_string()),
            capacity: self.capacity,
            base_price_cents: euros_to_cents(self.base_price),
            status: self
                .status
                .unwrap_or(EspaceStatus::Available)
                .as_str()
                .to_string(),
        })
    }
}

/// GET /api/admin/espaces
pub async fn list_espaces(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<EspaceResponse>>> {
    let espaces = EspaceRepo::list(&state.pool).await?;
    Ok(Json(map_all(&espaces)))
}

/// GET /api/admin/espaces/{id}
pub async fn get_espace(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<EspaceResponse>> {
    let espace = EspaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Espace", id))?;
    Ok(Json(EspaceResponse::from(&espace)))
}

/// POST /api/admin/espaces
pub async fn create_espace(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<EspaceRequest>,
) -> AppResult<(StatusCode, Json<EspaceResponse>)> {
    input.validate()?;
    let espace = EspaceRepo::create(&state.pool, &input.into_input()?).await?;
    tracing::info!(user_id = admin.user_id, espace_id = espace.id, "Space created");
    Ok((StatusCode::CREATED, Json(EspaceResponse::from(&espace))))
}

/// PUT /api/admin/espaces/{id}
///
/// Replace every field of a space.
pub async fn update_espace(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<EspaceRequest>,
) -> AppResult<Json<EspaceResponse>> {
    input.validate()?;
    let espace = EspaceRepo::update(&state.pool, id, &input.into_input()?)
        .await?
        .ok_or_else(|| AppError::not_found("Espace", id))?;
    tracing::info!(user_id = admin.user_id, espace_id = id, "Space updated");
    Ok(Json(EspaceResponse::from(&espace)))
}

/// DELETE /api/admin/espaces/{id}
///
/// Deletes the space with its reservations and the events held there
/// (with their registrations and childcare). Returns 204.
pub async fn delete_espace(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EspaceRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Espace", id));
    }
    tracing::info!(user_id = admin.user_id, espace_id = id, "Space deleted");
    Ok(StatusCode::NO_CONTENT)
}
