//! Admin childcare session management (`/admin/garderie/sessions`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cercle_core::pricing::euros_to_cents;
use cercle_core::status::GarderieSessionStatus;
use cercle_core::types::DbId;
use cercle_db::models::garderie::GarderieSessionInput;
use cercle_db::repositories::GarderieSessionRepo;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{map_all, GarderieSessionResponse};
use crate::state::AppState;

/// Request body for creating or replacing a session.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GarderieSessionRequest {
    #[validate(length(min = 1, max = 150, message = "Le titre est obligatoire (150 caractères max)"))]
    pub title: String,
    pub description: Option<String>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(range(min = 1, message = "La capacité doit être au moins 1"))]
    pub capacity: i32,
    #[validate(range(min = 0.0, message = "Le prix doit être positif"))]
    pub price_per_child: f64,
    /// Defaults to `OPEN`.
    pub status: Option<GarderieSessionStatus>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl GarderieSessionRequest {
    fn into_input(self) -> AppResult<GarderieSessionInput> {
        if self.end_time <= self.start_time {
            return Err(AppError::validation(
                "L'heure de fin doit être après l'heure de début",
            ));
        }
        cercle_core::event_planning::validate_ages(self.min_age, self.max_age)?;
        let title = cercle_core::event_planning::required_text(
            &self.title,
            1,
            150,
            "Le titre est obligatoire (150 caractères max)",
        )?;
        Ok(GarderieSessionInput {
            title,
            description: self.description,
            session_date: self.session_date,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            price_per_child_cents: euros_to_cents(self.price_per_child),
            status: self
                .status
                .unwrap_or(GarderieSessionStatus::Open)
                .as_str()
                .to_string(),
            min_age: self.min_age,
            max_age: self.max_age,
        })
    }
}

/// GET /api/admin/garderie/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<GarderieSessionResponse>>> {
    let sessions = GarderieSessionRepo::list_all(&state.pool).await?;
    Ok(Json(map_all(&sessions)))
}

/// GET /api/admin/garderie/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<GarderieSessionResponse>> {
    let session = GarderieSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Session", id))?;
    Ok(Json(GarderieSessionResponse::from(&session)))
}

/// POST /api/admin/garderie/sessions
pub async fn create_session(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<GarderieSessionRequest>,
) -> AppResult<(StatusCode, Json<GarderieSessionResponse>)> {
    input.validate()?;
    let session = GarderieSessionRepo::create(&state.pool, &input.into_input()?).await?;
    tracing::info!(user_id = admin.user_id, session_id = session.id, "Childcare session created");
    Ok((StatusCode::CREATED, Json(GarderieSessionResponse::from(&session))))
}

/// PUT /api/admin/garderie/sessions/{id}
pub async fn update_session(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<GarderieSessionRequest>,
) -> AppResult<Json<GarderieSessionResponse>> {
    input.validate()?;
    let session = GarderieSessionRepo::update(&state.pool, id, &input.into_input()?)
        .await?
        .ok_or_else(|| AppError::not_found("Session", id))?;
    tracing::info!(user_id = admin.user_id, session_id = id, "Childcare session updated");
    Ok(Json(GarderieSessionResponse::from(&session)))
}

/// DELETE /api/admin/garderie/sessions/{id}
///
/// The session's bookings are deleted with it.
pub async fn delete_session(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !GarderieSessionRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Session", id));
    }
    tracing::info!(user_id = admin.user_id, session_id = id, "Childcare session deleted");
    Ok(StatusCode::NO_CONTENT)
}
