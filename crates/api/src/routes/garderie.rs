//! Route definitions for `/public/garderie`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::garderie;
use crate::state::AppState;

/// Routes mounted at `/public/garderie`.
///
/// ```text
/// GET    /sessions                    -> list_open_sessions (public)
/// POST   /reservations                -> reserve
/// GET    /reservations/me             -> my_reservations
/// DELETE /reservations/{id}/cancel    -> cancel_reservation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(garderie::list_open_sessions))
        .route("/reservations", post(garderie::reserve))
        .route("/reservations/me", get(garderie::my_reservations))
        .route(
            "/reservations/{id}/cancel",
            delete(garderie::cancel_reservation),
        )
}
