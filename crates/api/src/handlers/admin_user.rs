//! Handlers for user administration (`/admin/users`).
//!
//! All handlers require the `ADMIN` role via [`RequireAdmin`]. Role and
//! status changes apply from the user's next login.

use axum::extract::{Path, State};
use axum::Json;
use cercle_core::roles::{validate_role, validate_user_status};
use cercle_core::types::DbId;
use cercle_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{map_all, UserResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(map_all(&users)))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur", id))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = input.role.trim().to_ascii_uppercase();
    validate_role(&role).map_err(AppError::validation)?;

    let user = UserRepo::set_role(&state.pool, id, &role)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur", id))?;

    tracing::info!(admin_id = admin.user_id, user_id = id, role = %role, "User role changed");
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/admin/users/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let status = input.status.trim().to_ascii_uppercase();
    validate_user_status(&status).map_err(AppError::validation)?;

    let user = UserRepo::set_status(&state.pool, id, &status)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur", id))?;

    tracing::info!(admin_id = admin.user_id, user_id = id, status = %status, "User status changed");
    Ok(Json(UserResponse::from(&user)))
}
