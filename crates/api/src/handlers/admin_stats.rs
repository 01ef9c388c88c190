//! Dashboard aggregates (`/admin/stats`).

use axum::extract::State;
use axum::Json;
use cercle_core::pricing::cents_to_euros;
use cercle_db::models::stats::PlatformStats;
use cercle_db::repositories::StatsRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Counts per domain and revenue of confirmed bookings, in euros.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_espaces: i64,
    pub total_events: i64,
    pub total_garderie_sessions: i64,
    pub confirmed_space_reservations: i64,
    pub cancelled_space_reservations: i64,
    pub pending_space_reservations: i64,
    pub space_revenue: f64,
    pub confirmed_event_registrations: i64,
    pub cancelled_event_registrations: i64,
    pub event_revenue: f64,
    pub confirmed_garderie_reservations: i64,
    pub cancelled_garderie_reservations: i64,
    pub garderie_revenue: f64,
    pub total_revenue: f64,
}

impl From<&PlatformStats> for StatsResponse {
    fn from(s: &PlatformStats) -> Self {
        Self {
            total_users: s.total_users,
            total_espaces: s.total_espaces,
            total_events: s.total_events,
            total_garderie_sessions: s.total_garderie_sessions,
            confirmed_space_reservations: s.confirmed_space_reservations,
            cancelled_space_reservations: s.cancelled_space_reservations,
            pending_space_reservations: s.pending_space_reservations,
            space_revenue: cents_to_euros(s.space_revenue_cents),
            confirmed_event_registrations: s.confirmed_event_registrations,
            cancelled_event_registrations: s.cancelled_event_registrations,
            event_revenue: cents_to_euros(s.event_revenue_cents),
            confirmed_garderie_reservations: s.confirmed_garderie_reservations,
            cancelled_garderie_reservations: s.cancelled_garderie_reservations,
            garderie_revenue: cents_to_euros(s.garderie_revenue_cents),
            total_revenue: cents_to_euros(s.total_revenue_cents()),
        }
    }
}

/// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<StatsResponse>> {
    let stats = StatsRepo::platform_stats(&state.pool).await?;
    Ok(Json(StatsResponse::from(&stats)))
}
