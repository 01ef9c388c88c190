//! Repository for the `garderie_sessions` table.

use cercle_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::garderie::{GarderieSession, GarderieSessionInput};

/// Select with the count of booked children; append a clause.
const SELECT: &str = "SELECT s.id, s.title, s.description, s.session_date, s.start_time, \
        s.end_time, s.capacity, s.price_per_child_cents, s.status, s.event_id, \
        s.min_age, s.max_age, \
        COALESCE((SELECT SUM(r.number_of_children) FROM garderie_reservations r \
                  WHERE r.session_id = s.id AND r.status <> 'CANCELLED'), 0)::INT AS registered_count, \
        s.created_at, s.updated_at \
     FROM garderie_sessions s";

/// Provides CRUD operations for childcare sessions.
pub struct GarderieSessionRepo;

impl GarderieSessionRepo {
    /// Insert a standalone session (not linked to an event).
    pub async fn create(
        pool: &PgPool,
        input: &GarderieSessionInput,
    ) -> Result<GarderieSession, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO garderie_sessions
                (title, description, session_date, start_time, end_time, capacity,
                 price_per_child_cents, status, min_age, max_age)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.session_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.capacity)
        .bind(input.price_per_child_cents)
        .bind(&input.status)
        .bind(input.min_age)
        .bind(input.max_age)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GarderieSession>, sqlx::Error> {
        let query = format!("{SELECT} WHERE s.id = $1");
        sqlx::query_as::<_, GarderieSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The session linked to an event, if any.
    pub async fn find_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Option<GarderieSession>, sqlx::Error> {
        let query = format!("{SELECT} WHERE s.event_id = $1");
        sqlx::query_as::<_, GarderieSession>(&query)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    /// Open sessions dated `today` or later, soonest first.
    pub async fn list_open_upcoming(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<GarderieSession>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE s.status = 'OPEN' AND s.session_date >= $1
             ORDER BY s.session_date, s.start_time, s.id"
        );
        sqlx::query_as::<_, GarderieSession>(&query)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Every session, latest date first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<GarderieSession>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY s.session_date DESC, s.start_time DESC, s.id DESC");
        sqlx::query_as::<_, GarderieSession>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace every writable field. Returns `None` if the session does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &GarderieSessionInput,
    ) -> Result<Option<GarderieSession>, sqlx::Error> {
        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE garderie_sessions SET
                title = $2,
                description = $3,
                session_date = $4,
                start_time = $5,
                end_time = $6,
                capacity = $7,
                price_per_child_cents = $8,
                status = $9,
                min_age = $10,
                max_age = $11
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.session_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.capacity)
        .bind(input.price_per_child_cents)
        .bind(&input.status)
        .bind(input.min_age)
        .bind(input.max_age)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(_) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Create or refresh the session linked to `event_id`.
    ///
    /// Runs inside the caller's transaction so the event and its session
    /// are written together.
    pub async fn upsert_for_event(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: DbId,
        input: &GarderieSessionInput,
    ) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO garderie_sessions
                (event_id, title, description, session_date, start_time, end_time, capacity,
                 price_per_child_cents, status, min_age, max_age)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (event_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                session_date = EXCLUDED.session_date,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                capacity = EXCLUDED.capacity,
                price_per_child_cents = EXCLUDED.price_per_child_cents,
                status = EXCLUDED.status,
                min_age = EXCLUDED.min_age,
                max_age = EXCLUDED.max_age
             RETURNING id",
        )
        .bind(event_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.session_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.capacity)
        .bind(input.price_per_child_cents)
        .bind(&input.status)
        .bind(input.min_age)
        .bind(input.max_age)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Delete a session. Its reservations cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM garderie_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM garderie_sessions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
