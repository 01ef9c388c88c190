//! Aggregates for the admin dashboard.

use cercle_core::types::Cents;
use sqlx::FromRow;

/// Counts and revenue across the three booking domains.
///
/// Revenue sums confirmed bookings only.
#[derive(Debug, Clone, Default, FromRow)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_espaces: i64,
    pub total_events: i64,
    pub total_garderie_sessions: i64,
    pub confirmed_space_reservations: i64,
    pub cancelled_space_reservations: i64,
    pub pending_space_reservations: i64,
    pub space_revenue_cents: Cents,
    pub confirmed_event_registrations: i64,
    pub cancelled_event_registrations: i64,
    pub event_revenue_cents: Cents,
    pub confirmed_garderie_reservations: i64,
    pub cancelled_garderie_reservations: i64,
    pub garderie_revenue_cents: Cents,
}

impl PlatformStats {
    pub fn total_revenue_cents(&self) -> Cents {
        self.space_revenue_cents + self.event_revenue_cents + self.garderie_revenue_cents
    }
}
