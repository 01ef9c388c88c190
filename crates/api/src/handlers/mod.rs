pub mod admin_espace;
pub mod admin_event;
pub mod admin_garderie;
pub mod admin_reservation;
pub mod admin_stats;
pub mod admin_user;
pub mod auth;
pub mod espace;
pub mod event;
pub mod event_input;
pub mod garderie;
pub mod organizer;
pub mod payment;
pub mod registration;
pub mod reservation;
pub mod user;

use std::str::FromStr;

use cercle_core::types::LocalDateTime;

use crate::error::{AppError, AppResult};

/// Wall-clock time of the association, used for "not in the past" rules.
pub(crate) fn local_now() -> LocalDateTime {
    chrono::Local::now().naive_local()
}

/// Parse a status column read from the database.
///
/// The CHECK constraints make a failure here an internal error.
pub(crate) fn parse_status<S>(value: &str) -> AppResult<S>
where
    S: FromStr<Err = String>,
{
    value.parse().map_err(AppError::InternalError)
}
