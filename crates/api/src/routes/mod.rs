pub mod admin;
pub mod auth;
pub mod events;
pub mod garderie;
pub mod health;
pub mod organizer;
pub mod payments;
pub mod reservations;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register, /auth/login                      sign-up and sign-in (public)
/// /user/me, /user/change-password                  own profile (requires auth)
///
/// /public/espaces                                  available spaces
/// /public/reservations/...                         space bookings and calendars
/// /public/events/...                               event catalogue and registrations
/// /public/garderie/...                             childcare sessions and bookings
///
/// /organizer/events/...                            event submissions (organizer, admin)
///
/// /admin/espaces/...                               space management
/// /admin/events/...                                event management and approval
/// /admin/garderie/sessions/...                     childcare session management
/// /admin/reservations/...                          bookings overview and approval
/// /admin/users/...                                 user roles and statuses
/// /admin/stats                                     dashboard totals
///
/// /payments/create-payment-intent                  payment intent (public)
/// /payments/verify/{paymentIntentId}               payment check (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login).
        .nest("/auth", auth::router())
        // Signed-in user's profile.
        .nest("/user", user::router())
        // Public catalogue and bookings.
        .route("/public/espaces", get(handlers::espace::list_available))
        .nest("/public/reservations", reservations::router())
        .nest("/public/events", events::router())
        .nest("/public/garderie", garderie::router())
        // Organizer submissions.
        .nest("/organizer/events", organizer::router())
        // Back office.
        .nest("/admin", admin::router())
        // Payment provider bridge.
        .nest("/payments", payments::router())
}
