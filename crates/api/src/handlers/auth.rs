//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::Json;
use cercle_core::error::CoreError;
use cercle_core::roles::{ROLE_MEMBER, USER_STATUS_ACTIVE};
use cercle_db::models::user::{CreateUser, User};
use cercle_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::{AuthResponse, UserResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 80, message = "Le prénom doit contenir entre 2 et 80 caractères"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 80, message = "Le nom doit contenir entre 2 et 80 caractères"))]
    pub last_name: String,
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(min = 8, max = 100, message = "Le mot de passe doit contenir entre 8 et 100 caractères"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email requis"))]
    pub email: String,
    #[validate(length(min = 1, message = "Mot de passe requis"))]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an active `MEMBER` account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;
    let email = normalize_email(&input.email);

    if UserRepo::email_taken(&state.pool, &email, None).await? {
        return Err(AppError::validation("Email déjà utilisé"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email,
            password_hash,
            role: ROLE_MEMBER.to_string(),
            status: USER_STATUS_ACTIVE.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    auth_response(&state, &user).map(Json)
}

/// POST /api/auth/login
///
/// Authenticate with email + password and return a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;
    let invalid = || AppError::Core(CoreError::Unauthorized("Email ou mot de passe incorrect".into()));

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    if user.status != USER_STATUS_ACTIVE {
        tracing::info!(user_id = user.id, status = %user.status, "Login refused for inactive account");
        return Err(AppError::forbidden("Compte désactivé ou bloqué"));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    auth_response(&state, &user).map(Json)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Emails are compared and stored lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, &user.role, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}
