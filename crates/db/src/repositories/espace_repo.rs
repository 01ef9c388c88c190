//! Repository for the `espaces` table.

use cercle_core::types::DbId;
use sqlx::PgPool;

use crate::models::espace::{Espace, EspaceInput};

const COLUMNS: &str = "id, name, type, capacity, base_price_cents, status, created_at, updated_at";

/// Provides CRUD operations for spaces.
pub struct EspaceRepo;

impl EspaceRepo {
    pub async fn create(pool: &PgPool, input: &EspaceInput) -> Result<Espace, sqlx::Error> {
        let query = format!(
            "INSERT INTO espaces (name, type, capacity, base_price_cents, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Espace>(&query)
            .bind(&input.name)
            .bind(&input.espace_type)
            .bind(input.capacity)
            .bind(input.base_price_cents)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Espace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM espaces WHERE id = $1");
        sqlx::query_as::<_, Espace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every space by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Espace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM espaces ORDER BY name, id");
        sqlx::query_as::<_, Espace>(&query).fetch_all(pool).await
    }

    /// List spaces with the given status, by name.
    pub async fn list_by_status(pool: &PgPool, status: &str) -> Result<Vec<Espace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM espaces WHERE status = $1 ORDER BY name, id");
        sqlx::query_as::<_, Espace>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Replace every writable field. Returns `None` if the space does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &EspaceInput,
    ) -> Result<Option<Espace>, sqlx::Error> {
        let query = format!(
            "UPDATE espaces SET
                name = $2,
                type = $3,
                capacity = $4,
                base_price_cents = $5,
                status = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Espace>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.espace_type)
            .bind(input.capacity)
            .bind(input.base_price_cents)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a space.
    ///
    /// Foreign keys cascade to its reservations and to the events hosted on
    /// it, along with their registrations and childcare sessions.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM espaces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM espaces")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
