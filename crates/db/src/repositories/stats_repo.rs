//! Dashboard aggregates.

use sqlx::PgPool;

use crate::models::stats::PlatformStats;

/// Computes [`PlatformStats`] in a single round trip.
pub struct StatsRepo;

impl StatsRepo {
    pub async fn platform_stats(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM espaces) AS total_espaces,
                (SELECT COUNT(*) FROM events) AS total_events,
                (SELECT COUNT(*) FROM garderie_sessions) AS total_garderie_sessions,
                (SELECT COUNT(*) FROM reservations WHERE status = 'CONFIRMED')
                    AS confirmed_space_reservations,
                (SELECT COUNT(*) FROM reservations WHERE status = 'CANCELLED')
                    AS cancelled_space_reservations,
                (SELECT COUNT(*) FROM reservations WHERE status = 'PENDING_APPROVAL')
                    AS pending_space_reservations,
                (SELECT COALESCE(SUM(total_price_cents), 0)::BIGINT FROM reservations
                    WHERE status = 'CONFIRMED') AS space_revenue_cents,
                (SELECT COUNT(*) FROM event_registrations WHERE status = 'CONFIRMED')
                    AS confirmed_event_registrations,
                (SELECT COUNT(*) FROM event_registrations WHERE status = 'CANCELLED')
                    AS cancelled_event_registrations,
                (SELECT COALESCE(SUM(total_price_cents), 0)::BIGINT FROM event_registrations
                    WHERE status = 'CONFIRMED') AS event_revenue_cents,
                (SELECT COUNT(*) FROM garderie_reservations WHERE status = 'CONFIRMED')
                    AS confirmed_garderie_reservations,
                (SELECT COUNT(*) FROM garderie_reservations WHERE status = 'CANCELLED')
                    AS cancelled_garderie_reservations,
                (SELECT COALESCE(SUM(total_price_cents), 0)::BIGINT FROM garderie_reservations
                    WHERE status = 'CONFIRMED') AS garderie_revenue_cents",
        )
        .fetch_one(pool)
        .await
    }
}
