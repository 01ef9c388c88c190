//! Route definitions for the `/user` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`. All require authentication.
///
/// ```text
/// GET  /me               -> get_me
/// PUT  /me               -> update_me
/// POST /change-password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::get_me).put(user::update_me))
        .route("/change-password", post(user::change_password))
}
