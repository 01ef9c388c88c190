//! Repository for the `events` table and the childcare session linked to
//! each event.

use cercle_core::status::EventStatus;
use cercle_core::types::{DbId, LocalDateTime};
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, EventFields};
use crate::models::garderie::GarderieSessionInput;

use super::garderie_session_repo::GarderieSessionRepo;

/// Joined select for [`Event`]; append a `WHERE` / `ORDER BY` clause.
const SELECT: &str = "SELECT e.id, e.title, e.description, e.start_date_time, e.end_date_time, \
        e.capacity, e.price_cents, e.min_age, e.max_age, e.status, e.location_type, \
        e.space_id, e.external_address, e.location, e.garderie_required, \
        e.created_by, c.first_name || ' ' || c.last_name AS created_by_name, \
        e.approved_by, a.first_name || ' ' || a.last_name AS approved_by_name, \
        e.approved_at, e.rejection_reason, \
        COALESCE((SELECT SUM(r.number_of_participants) FROM event_registrations r \
                  WHERE r.event_id = e.id AND r.status <> 'CANCELLED'), 0)::INT AS registered_count, \
        (SELECT g.id FROM garderie_sessions g WHERE g.event_id = e.id) AS garderie_session_id, \
        e.created_at, e.updated_at \
     FROM events e \
     LEFT JOIN users c ON c.id = e.created_by \
     LEFT JOIN users a ON a.id = e.approved_by";

/// Provides event persistence and the approval queries.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event and, when given, its linked childcare session in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        garderie: Option<&GarderieSessionInput>,
    ) -> Result<Event, sqlx::Error> {
        let f = &input.fields;
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO events
                (title, description, start_date_time, end_date_time, capacity, price_cents,
                 min_age, max_age, location_type, space_id, external_address, location,
                 garderie_required, status, created_by, approved_by, approved_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     CASE WHEN $16::BIGINT IS NULL THEN NULL ELSE NOW() END)
             RETURNING id",
        )
        .bind(&f.title)
        .bind(&f.description)
        .bind(f.start_date_time)
        .bind(f.end_date_time)
        .bind(f.capacity)
        .bind(f.price_cents)
        .bind(f.min_age)
        .bind(f.max_age)
        .bind(&f.location_type)
        .bind(f.space_id)
        .bind(&f.external_address)
        .bind(&f.location)
        .bind(f.garderie_required)
        .bind(&input.status)
        .bind(input.created_by)
        .bind(input.approved_by)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(session) = garderie {
            GarderieSessionRepo::upsert_for_event(&mut tx, id, session).await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("{SELECT} WHERE e.id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the event's fields and status, and sync its childcare session.
    ///
    /// With `garderie` set the linked session is created or updated; without
    /// it an existing linked session is cancelled. A resubmitted event
    /// (`PENDING_APPROVAL`) loses its rejection reason.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &EventFields,
        status: EventStatus,
        garderie: Option<&GarderieSessionInput>,
    ) -> Result<Option<Event>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE events SET
                title = $2,
                description = $3,
                start_date_time = $4,
                end_date_time = $5,
                capacity = $6,
                price_cents = $7,
                min_age = $8,
                max_age = $9,
                location_type = $10,
                space_id = $11,
                external_address = $12,
                location = $13,
                garderie_required = $14,
                status = $15,
                rejection_reason = CASE WHEN $15 = 'PENDING_APPROVAL' THEN NULL
                                        ELSE rejection_reason END,
                approved_at = CASE WHEN $15 = 'PUBLISHED' THEN COALESCE(approved_at, NOW())
                                   ELSE approved_at END
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.start_date_time)
        .bind(fields.end_date_time)
        .bind(fields.capacity)
        .bind(fields.price_cents)
        .bind(fields.min_age)
        .bind(fields.max_age)
        .bind(&fields.location_type)
        .bind(fields.space_id)
        .bind(&fields.external_address)
        .bind(&fields.location)
        .bind(fields.garderie_required)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        match garderie {
            Some(session) => {
                GarderieSessionRepo::upsert_for_event(&mut tx, id, session).await?;
            }
            None => {
                sqlx::query(
                    "UPDATE garderie_sessions SET status = 'CANCELLED' WHERE event_id = $1",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Store an admin decision on a pending event.
    ///
    /// Approval records the approver and time. Guarded on `PENDING_APPROVAL`;
    /// returns `None` if the event was decided concurrently or does not exist.
    pub async fn record_decision(
        pool: &PgPool,
        id: DbId,
        status: EventStatus,
        admin_id: DbId,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Event>, sqlx::Error> {
        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE events SET
                status = $2,
                approved_by = CASE WHEN $2 = 'PUBLISHED' THEN $3 ELSE approved_by END,
                approved_at = CASE WHEN $2 = 'PUBLISHED' THEN NOW() ELSE approved_at END,
                rejection_reason = $4
             WHERE id = $1 AND status = 'PENDING_APPROVAL'
             RETURNING id",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(admin_id)
        .bind(rejection_reason)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(_) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Force an event's status. Publishing stamps `approved_at` if unset.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE events SET
                status = $2,
                approved_at = CASE WHEN $2 = 'PUBLISHED' THEN COALESCE(approved_at, NOW())
                                   ELSE approved_at END
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(_) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete an event. Registrations and the linked session cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Published events starting after `now`, soonest first.
    pub async fn list_published_upcoming(
        pool: &PgPool,
        now: LocalDateTime,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE e.status = 'PUBLISHED' AND e.start_date_time > $1
             ORDER BY e.start_date_time, e.id"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Every event, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY e.created_at DESC, e.id DESC");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// Events with the given status, oldest submission first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: EventStatus,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("{SELECT} WHERE e.status = $1 ORDER BY e.created_at, e.id");
        sqlx::query_as::<_, Event>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Events submitted by `user_id`, newest first.
    pub async fn list_by_creator(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE e.created_by = $1 ORDER BY e.created_at DESC, e.id DESC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether another live event occupies `space_id` during `[start, end)`.
    ///
    /// Cancelled and rejected events are ignored, as is `exclude_id` (the
    /// event being edited).
    pub async fn exists_overlapping_for_space(
        pool: &PgPool,
        space_id: DbId,
        start: LocalDateTime,
        end: LocalDateTime,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM events
                WHERE space_id = $1
                  AND status NOT IN ('CANCELLED', 'REJECTED')
                  AND start_date_time < $3
                  AND end_date_time > $2
                  AND ($4::BIGINT IS NULL OR id <> $4)
             )",
        )
        .bind(space_id)
        .bind(start)
        .bind(end)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
