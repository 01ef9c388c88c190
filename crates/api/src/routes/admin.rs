//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{
    admin_espace, admin_event, admin_garderie, admin_reservation, admin_stats, admin_user,
};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `ADMIN` role (enforced by handler extractors).
///
/// ```text
/// GET    /espaces                         -> list_espaces
/// POST   /espaces                         -> create_espace
/// GET    /espaces/{id}                    -> get_espace
/// PUT    /espaces/{id}                    -> update_espace
/// DELETE /espaces/{id}                    -> delete_espace
///
/// GET    /events                          -> list_events
/// POST   /events                          -> create_event
/// GET    /events/pending                  -> list_pending
/// GET    /events/{id}                     -> get_event
/// PUT    /events/{id}                     -> update_event
/// DELETE /events/{id}                     -> delete_event
/// POST   /events/{id}/approve             -> decide
/// PATCH  /events/{id}/status?status=      -> set_status
///
/// GET    /garderie/sessions               -> list_sessions
/// POST   /garderie/sessions               -> create_session
/// GET    /garderie/sessions/{id}          -> get_session
/// PUT    /garderie/sessions/{id}          -> update_session
/// DELETE /garderie/sessions/{id}          -> delete_session
///
/// GET    /reservations/all                -> list_all
/// GET    /reservations/spaces             -> list_spaces
/// GET    /reservations/events             -> list_event_registrations
/// GET    /reservations/childcare          -> list_childcare
/// GET    /reservations/espaces            -> list_spaces_unified
/// GET    /reservations/garderie           -> list_childcare_unified
/// GET    /reservations/pending            -> list_pending
/// GET    /reservations/{id}               -> get_reservation
/// POST   /reservations/{id}/approve       -> decide
///
/// GET    /users                           -> list_users
/// GET    /users/{id}                      -> get_user
/// PUT    /users/{id}/role                 -> update_role
/// PUT    /users/{id}/status               -> update_status
///
/// GET    /stats                           -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Spaces.
        .route(
            "/espaces",
            get(admin_espace::list_espaces).post(admin_espace::create_espace),
        )
        .route(
            "/espaces/{id}",
            get(admin_espace::get_espace)
                .put(admin_espace::update_espace)
                .delete(admin_espace::delete_espace),
        )
        // Events.
        .route(
            "/events",
            get(admin_event::list_events).post(admin_event::create_event),
        )
        .route("/events/pending", get(admin_event::list_pending))
        .route(
            "/events/{id}",
            get(admin_event::get_event)
                .put(admin_event::update_event)
                .delete(admin_event::delete_event),
        )
        .route("/events/{id}/approve", post(admin_event::decide))
        .route("/events/{id}/status", patch(admin_event::set_status))
        // Childcare sessions.
        .route(
            "/garderie/sessions",
            get(admin_garderie::list_sessions).post(admin_garderie::create_session),
        )
        .route(
            "/garderie/sessions/{id}",
            get(admin_garderie::get_session)
                .put(admin_garderie::update_session)
                .delete(admin_garderie::delete_session),
        )
        // Bookings overview.
        .route("/reservations/all", get(admin_reservation::list_all))
        .route("/reservations/spaces", get(admin_reservation::list_spaces))
        .route(
            "/reservations/events",
            get(admin_reservation::list_event_registrations),
        )
        .route("/reservations/childcare", get(admin_reservation::list_childcare))
        .route(
            "/reservations/espaces",
            get(admin_reservation::list_spaces_unified),
        )
        .route(
            "/reservations/garderie",
            get(admin_reservation::list_childcare_unified),
        )
        .route("/reservations/pending", get(admin_reservation::list_pending))
        .route("/reservations/{id}", get(admin_reservation::get_reservation))
        .route("/reservations/{id}/approve", post(admin_reservation::decide))
        // Users.
        .route("/users", get(admin_user::list_users))
        .route("/users/{id}", get(admin_user::get_user))
        .route("/users/{id}/role", put(admin_user::update_role))
        .route("/users/{id}/status", put(admin_user::update_status))
        // Dashboard.
        .route("/stats", get(admin_stats::get_stats))
}
