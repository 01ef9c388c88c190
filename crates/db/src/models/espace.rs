//! Space entity model and DTOs.

use cercle_core::types::{Cents, DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `espaces` table.
#[derive(Debug, Clone, FromRow)]
pub struct Espace {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    pub espace_type: Option<String>,
    pub capacity: Option<i32>,
    pub base_price_cents: Cents,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Writable fields of a space. Updates replace every field.
#[derive(Debug, Clone)]
pub struct EspaceInput {
    pub name: String,
    pub espace_type: Option<String>,
    pub capacity: Option<i32>,
    pub base_price_cents: Cents,
    pub status: String,
}
