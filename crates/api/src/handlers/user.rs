//! Handlers for the signed-in user's own profile (`/user`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cercle_core::error::CoreError;
use cercle_db::models::user::{UpdateProfile, User};
use cercle_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use super::auth::normalize_email;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::UserResponse;
use crate::state::AppState;

/// Request body for `PUT /user/me`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 80, message = "Le prénom doit contenir entre 2 et 80 caractères"))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 80, message = "Le nom doit contenir entre 2 et 80 caractères"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Email invalide"))]
    pub email: Option<String>,
}

/// Request body for `POST /user/change-password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Mot de passe actuel requis"))]
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/user/me
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<UserResponse>> {
    let user = current_user(&state, user.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/user/me
///
/// Edit name and email. A new email must not belong to another account.
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    let email = input.email.as_deref().map(normalize_email);

    if let Some(email) = &email {
        if UserRepo::email_taken(&state.pool, email, Some(auth.user_id)).await? {
            return Err(AppError::validation("Email déjà utilisé"));
        }
    }

    let update = UpdateProfile {
        first_name: input.first_name.map(|s| s.trim().to_string()),
        last_name: input.last_name.map(|s| s.trim().to_string()),
        email,
    };
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(unknown_user)?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/user/change-password
///
/// Returns 204 No Content once the new hash is stored.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    let user = current_user(&state, auth.user_id).await?;
    let matches = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(AppError::validation("Mot de passe actuel incorrect"));
    }

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn current_user(state: &AppState, user_id: cercle_core::types::DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(unknown_user)
}

/// The token refers to an account that no longer exists.
fn unknown_user() -> AppError {
    AppError::Core(CoreError::Unauthorized("Utilisateur introuvable".into()))
}
