//! Route definitions for `/public/events`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{event, registration};
use crate::state::AppState;

/// Routes mounted at `/public/events`.
///
/// ```text
/// GET    /                            -> list_published (public)
/// GET    /{id}                        -> get_published (public)
/// POST   /register                    -> register
/// GET    /registrations/me            -> my_registrations
/// DELETE /registrations/{id}/cancel   -> cancel_registration
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event::list_published))
        .route("/{id}", get(event::get_published))
        .route("/register", post(registration::register))
        .route("/registrations/me", get(registration::my_registrations))
        .route(
            "/registrations/{id}/cancel",
            delete(registration::cancel_registration),
        )
}
