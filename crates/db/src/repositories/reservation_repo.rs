//! Repository for the `reservations` table.

use cercle_core::status::ReservationStatus;
use cercle_core::types::{DbId, LocalDateTime};
use sqlx::PgPool;

use crate::models::reservation::{
    CalendarEntry, CreateReservation, Reservation, ReservationDetail,
};

const COLUMNS: &str = "id, user_id, espace_id, start_date_time, end_date_time, \
                       total_price_cents, status, payment_intent_id, justification, \
                       approved_by, approved_at, rejection_reason, created_at, updated_at";

/// Joined select for [`ReservationDetail`]; append a `WHERE` clause.
const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, r.espace_id, r.start_date_time, r.end_date_time, \
        r.total_price_cents, r.status, r.payment_intent_id, r.justification, \
        r.approved_at, r.rejection_reason, r.created_at, \
        u.first_name AS user_first_name, u.last_name AS user_last_name, \
        u.email AS user_email, u.role AS user_role, u.status AS user_status, \
        u.created_at AS user_created_at, \
        e.name AS espace_name, e.type AS espace_type, e.capacity AS espace_capacity, \
        e.base_price_cents AS espace_base_price_cents, e.status AS espace_status \
     FROM reservations r \
     JOIN users u ON u.id = r.user_id \
     JOIN espaces e ON e.id = r.espace_id";

/// Statuses that no longer hold a slot.
const FREE_STATUSES: &str = "('CANCELLED', 'REJECTED')";

/// Provides reservation persistence and slot queries.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a reservation unless it overlaps a slot-holding reservation on
    /// the same space.
    ///
    /// Runs under `SERIALIZABLE` with the space row locked, so two concurrent
    /// requests for the same slot cannot both succeed. Returns `None` when the
    /// slot is taken. A serialization failure surfaces as a database error
    /// with SQLSTATE `40001`.
    pub async fn create_if_free(
        pool: &PgPool,
        input: &CreateReservation,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        sqlx::query("SELECT id FROM espaces WHERE id = $1 FOR UPDATE")
            .bind(input.espace_id)
            .execute(&mut *tx)
            .await?;

        let overlap_query = format!(
            "SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE espace_id = $1
                  AND status NOT IN {FREE_STATUSES}
                  AND start_date_time < $3
                  AND end_date_time > $2
             )"
        );
        let (taken,): (bool,) = sqlx::query_as(&overlap_query)
            .bind(input.espace_id)
            .bind(input.start_date_time)
            .bind(input.end_date_time)
            .fetch_one(&mut *tx)
            .await?;
        if taken {
            tx.rollback().await?;
            return Ok(None);
        }

        let insert = format!(
            "INSERT INTO reservations
                (user_id, espace_id, start_date_time, end_date_time, total_price_cents,
                 status, payment_intent_id, justification)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, Reservation>(&insert)
            .bind(input.user_id)
            .bind(input.espace_id)
            .bind(input.start_date_time)
            .bind(input.end_date_time)
            .bind(input.total_price_cents)
            .bind(&input.status)
            .bind(&input.payment_intent_id)
            .bind(&input.justification)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(reservation))
    }

    /// Whether a slot-holding reservation on `espace_id` overlaps the
    /// half-open interval `[start, end)`.
    pub async fn exists_overlapping(
        pool: &PgPool,
        espace_id: DbId,
        start: LocalDateTime,
        end: LocalDateTime,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE espace_id = $1
                  AND status NOT IN {FREE_STATUSES}
                  AND start_date_time < $3
                  AND end_date_time > $2
             )"
        );
        let (taken,): (bool,) = sqlx::query_as(&query)
            .bind(espace_id)
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;
        Ok(taken)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a reservation with its user and space.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReservationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's reservations, most recent start first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.user_id = $1 ORDER BY r.start_date_time DESC, r.id DESC"
        );
        sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Confirmed reservations on a space overlapping `[from, to)`.
    pub async fn list_confirmed_in_period(
        pool: &PgPool,
        espace_id: DbId,
        from: LocalDateTime,
        to: LocalDateTime,
    ) -> Result<Vec<CalendarEntry>, sqlx::Error> {
        sqlx::query_as::<_, CalendarEntry>(
            "SELECT id, start_date_time, end_date_time FROM reservations
             WHERE espace_id = $1
               AND status = 'CONFIRMED'
               AND start_date_time < $3
               AND end_date_time > $2
             ORDER BY start_date_time",
        )
        .bind(espace_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Every slot-holding reservation on a space overlapping `[from, to)`.
    pub async fn list_blocking_in_period(
        pool: &PgPool,
        espace_id: DbId,
        from: LocalDateTime,
        to: LocalDateTime,
    ) -> Result<Vec<CalendarEntry>, sqlx::Error> {
        let query = format!(
            "SELECT id, start_date_time, end_date_time FROM reservations
             WHERE espace_id = $1
               AND status NOT IN {FREE_STATUSES}
               AND start_date_time < $3
               AND end_date_time > $2
             ORDER BY start_date_time"
        );
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(espace_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Auditorium requests awaiting a decision, oldest first.
    pub async fn list_pending_approval(
        pool: &PgPool,
    ) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.status = 'PENDING_APPROVAL' ORDER BY r.created_at, r.id"
        );
        sqlx::query_as::<_, ReservationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Every reservation, newest first.
    pub async fn list_all_detailed(pool: &PgPool) -> Result<Vec<ReservationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.created_at DESC, r.id DESC");
        sqlx::query_as::<_, ReservationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Store an admin decision on a pending request.
    ///
    /// Guarded on `PENDING_APPROVAL`; returns `None` if the reservation was
    /// decided concurrently or does not exist.
    pub async fn record_decision(
        pool: &PgPool,
        id: DbId,
        status: ReservationStatus,
        admin_id: DbId,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET
                status = $2,
                approved_by = $3,
                approved_at = NOW(),
                rejection_reason = $4
             WHERE id = $1 AND status = 'PENDING_APPROVAL'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(admin_id)
            .bind(rejection_reason)
            .fetch_optional(pool)
            .await
    }

    /// Record the payment of an approved request and confirm it.
    ///
    /// Guarded on `APPROVED`; returns `None` otherwise.
    pub async fn confirm_payment(
        pool: &PgPool,
        id: DbId,
        payment_intent_id: &str,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET status = 'CONFIRMED', payment_intent_id = $2
             WHERE id = $1 AND status = 'APPROVED'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(payment_intent_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the status of a reservation.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ReservationStatus,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark a reservation cancelled. Returns `None` if it does not exist.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        Self::set_status(pool, id, ReservationStatus::Cancelled).await
    }
}
