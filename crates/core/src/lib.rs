//! Domain rules for the CERCLE booking platform.
//!
//! Pure functions and types shared by the database layer, the HTTP service
//! and the API client: statuses, roles, pricing, availability grids and the
//! approval / event-planning validations.

pub mod approval;
pub mod availability;
pub mod error;
pub mod event_planning;
pub mod pricing;
pub mod roles;
pub mod status;
pub mod types;
