//! Route definitions for `/organizer/events`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::organizer;
use crate::state::AppState;

/// Routes mounted at `/organizer/events`.
///
/// Requires the `ORGANIZER` or `ADMIN` role (enforced by handler extractors).
///
/// ```text
/// POST   /          -> create_event
/// GET    /my        -> my_events
/// GET    /my/{id}   -> my_event
/// PUT    /my/{id}   -> update_my_event
/// DELETE /my/{id}   -> cancel_my_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(organizer::create_event))
        .route("/my", get(organizer::my_events))
        .route(
            "/my/{id}",
            get(organizer::my_event)
                .put(organizer::update_my_event)
                .delete(organizer::cancel_my_event),
        )
}
