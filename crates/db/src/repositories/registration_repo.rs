//! Repository for the `event_registrations` table.

use cercle_core::event_planning::fits_capacity;
use cercle_core::types::DbId;
use sqlx::PgPool;

use crate::models::garderie::GarderieBookingOutcome;
use crate::models::registration::{
    CreateRegistration, EventRegistration, RegistrationDetail, RegistrationOutcome,
};

use super::garderie_reservation_repo::GarderieReservationRepo;

const COLUMNS: &str = "id, user_id, event_id, number_of_participants, total_price_cents, status, \
                       payment_intent_id, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, r.event_id, r.number_of_participants, \
        r.total_price_cents, r.status, r.payment_intent_id, r.created_at, \
        e.title AS event_title, e.start_date_time AS event_start_date_time, \
        e.end_date_time AS event_end_date_time, \
        u.first_name AS user_first_name, u.last_name AS user_last_name, u.email AS user_email \
     FROM event_registrations r \
     JOIN events e ON e.id = r.event_id \
     JOIN users u ON u.id = r.user_id";

/// Provides event registration operations.
pub struct EventRegistrationRepo;

impl EventRegistrationRepo {
    /// Register to an event, with the optional childcare booking, atomically.
    ///
    /// The event row is locked while its participant total is checked, and
    /// the childcare booking goes through the same locked check on its
    /// session. Nothing is written unless both fit. A second active
    /// registration by the same user violates
    /// `uq_event_registrations_active_user_event`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegistration,
    ) -> Result<RegistrationOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (capacity,): (i32,) =
            sqlx::query_as("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(input.event_id)
                .fetch_one(&mut *tx)
                .await?;

        let (registered,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_participants), 0)::BIGINT FROM event_registrations
             WHERE event_id = $1 AND status <> 'CANCELLED'",
        )
        .bind(input.event_id)
        .fetch_one(&mut *tx)
        .await?;

        if !fits_capacity(capacity, registered, input.number_of_participants) {
            tx.rollback().await?;
            return Ok(RegistrationOutcome::EventFull);
        }

        let query = format!(
            "INSERT INTO event_registrations
                (user_id, event_id, number_of_participants, total_price_cents, status,
                 payment_intent_id)
             VALUES ($1, $2, $3, $4, 'CONFIRMED', $5)
             RETURNING {COLUMNS}"
        );
        let registration = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(input.user_id)
            .bind(input.event_id)
            .bind(input.number_of_participants)
            .bind(input.total_price_cents)
            .bind(&input.payment_intent_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(childcare) = &input.childcare {
            if let GarderieBookingOutcome::Full { remaining } =
                GarderieReservationRepo::book_in_tx(&mut tx, childcare).await?
            {
                tx.rollback().await?;
                return Ok(RegistrationOutcome::ChildcareFull { remaining });
            }
        }

        tx.commit().await?;
        Ok(RegistrationOutcome::Created(registration))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EventRegistration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_registrations WHERE id = $1");
        sqlx::query_as::<_, EventRegistration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RegistrationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, RegistrationDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's registrations, soonest event first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RegistrationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE r.user_id = $1 ORDER BY e.start_date_time, r.id"
        );
        sqlx::query_as::<_, RegistrationDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every registration, newest first.
    pub async fn list_all_detailed(pool: &PgPool) -> Result<Vec<RegistrationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.created_at DESC, r.id DESC");
        sqlx::query_as::<_, RegistrationDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Participants registered to an event, cancelled registrations excluded.
    pub async fn total_participants(pool: &PgPool, event_id: DbId) -> Result<i32, sqlx::Error> {
        let (total,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_participants), 0)::INT FROM event_registrations
             WHERE event_id = $1 AND status <> 'CANCELLED'",
        )
        .bind(event_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Whether the user already holds an active registration to the event.
    pub async fn exists_active_for_user(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM event_registrations
                WHERE user_id = $1 AND event_id = $2 AND status <> 'CANCELLED'
             )",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Mark a registration cancelled. Returns `None` if it does not exist.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EventRegistration>, sqlx::Error> {
        let query = format!(
            "UPDATE event_registrations SET status = 'CANCELLED' WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventRegistration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
