//! Row models and write DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row (or a joined view of it)
//! - Plain input structs for inserts and updates
//!
//! Status columns are kept as `String`; callers convert through the enums
//! in `cercle_core::status`.

pub mod espace;
pub mod event;
pub mod garderie;
pub mod registration;
pub mod reservation;
pub mod stats;
pub mod user;
