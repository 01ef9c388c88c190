//! Route definitions for `/public/reservations`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::reservation;
use crate::state::AppState;

/// Routes mounted at `/public/reservations`.
///
/// ```text
/// POST   /                        -> create_reservation
/// POST   /auditorium              -> request_auditorium
/// POST   /{id}/pay                -> pay_reservation
/// DELETE /{id}/cancel             -> cancel_reservation
/// GET    /me                      -> my_reservations
/// GET    /user/{userId}           -> user_reservations
/// GET    /check-availability      -> check_availability (public)
/// GET    /espace/{id}/calendar    -> espace_calendar (public)
/// GET    /espace/{id}/day-slots   -> espace_day_slots (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reservation::create_reservation))
        .route("/auditorium", post(reservation::request_auditorium))
        .route("/{id}/pay", post(reservation::pay_reservation))
        .route("/{id}/cancel", delete(reservation::cancel_reservation))
        .route("/me", get(reservation::my_reservations))
        .route("/user/{user_id}", get(reservation::user_reservations))
        .route("/check-availability", get(reservation::check_availability))
        .route("/espace/{id}/calendar", get(reservation::espace_calendar))
        .route("/espace/{id}/day-slots", get(reservation::espace_day_slots))
}
