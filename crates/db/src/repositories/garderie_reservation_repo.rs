//! Repository for the `garderie_reservations` table.

use cercle_core::event_planning::fits_capacity;
use cercle_core::types::DbId;
use sqlx::PgPool;

use crate::models::garderie::{
    CreateGarderieReservation, GarderieBookingOutcome, GarderieReservation,
    GarderieReservationDetail,
};

const COLUMNS: &str = "id, user_id, session_id, number_of_children, total_price_cents, status, \
                       payment_intent_id, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, r.session_id, r.number_of_children, \
        r.total_price_cents, r.status, r.payment_intent_id, r.created_at, \
        s.title AS session_title, s.session_date, s.start_time, s.end_time, \
        u.first_name AS user_first_name, u.last_name AS user_last_name, u.email AS user_email \
     FROM garderie_reservations r \
     JOIN garderie_sessions s ON s.id = r.session_id \
     JOIN users u ON u.id = r.user_id";

/// Provides childcare booking operations.
pub struct GarderieReservationRepo;

impl GarderieReservationRepo {
    /// Book childcare places if the session still has room.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGarderieReservation,
    ) -> Result<GarderieBookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let outcome = Self::book_in_tx(&mut tx, input).await?;
        match &outcome {
            GarderieBookingOutcome::Created(_) => tx.commit().await?,
            GarderieBookingOutcome::Full { .. } => tx.rollback().await?,
        }
        Ok(outcome)
    }

    /// Capacity check and insert under a row lock on the session.
    ///
    /// Concurrent bookings on the same session serialize on the lock, so the
    /// booked total never exceeds the capacity.
    pub(crate) async fn book_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateGarderieReservation,
    ) -> Result<GarderieBookingOutcome, sqlx::Error> {
        let (capacity,): (i32,) =
            sqlx::query_as("SELECT capacity FROM garderie_sessions WHERE id = $1 FOR UPDATE")
                .bind(input.session_id)
                .fetch_one(&mut **tx)
                .await?;

        let (booked,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_children), 0)::BIGINT FROM garderie_reservations
             WHERE session_id = $1 AND status <> 'CANCELLED'",
        )
        .bind(input.session_id)
        .fetch_one(&mut **tx)
        .await?;

        if !fits_capacity(capacity, booked, input.number_of_children) {
            let remaining = (i64::from(capacity) - booked).max(0) as i32;
            return Ok(GarderieBookingOutcome::Full { remaining });
        }

        let query = format!(
            "INSERT INTO garderie_reservations
                (user_id, session_id, number_of_children, total_price_cents, status,
                 payment_intent_id)
             VALUES ($1, $2, $3, $4, 'CONFIRMED', $5)
             RETURNING {COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, GarderieReservation>(&query)
            .bind(input.user_id)
            .bind(input.session_id)
            .bind(input.number_of_children)
            .bind(input.total_price_cents)
            .bind(&input.payment_intent_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(GarderieBookingOutcome::Created(reservation))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GarderieReservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM garderie_reservations WHERE id = $1");
        sqlx::query_as::<_, GarderieReservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GarderieReservationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, GarderieReservationDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's childcare bookings, soonest session first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<GarderieReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.user_id = $1
             ORDER BY s.session_date, s.start_time, r.id"
        );
        sqlx::query_as::<_, GarderieReservationDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every childcare booking, newest first.
    pub async fn list_all_detailed(
        pool: &PgPool,
    ) -> Result<Vec<GarderieReservationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.created_at DESC, r.id DESC");
        sqlx::query_as::<_, GarderieReservationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Children booked on a session, cancelled bookings excluded.
    pub async fn total_children(pool: &PgPool, session_id: DbId) -> Result<i32, sqlx::Error> {
        let (total,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_children), 0)::INT FROM garderie_reservations
             WHERE session_id = $1 AND status <> 'CANCELLED'",
        )
        .bind(session_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Mark a booking cancelled. Returns `None` if it does not exist.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GarderieReservation>, sqlx::Error> {
        let query = format!(
            "UPDATE garderie_reservations SET status = 'CANCELLED' WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GarderieReservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
