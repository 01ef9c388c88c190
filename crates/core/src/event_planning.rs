//! Validation of event submissions and derivation of the linked childcare
//! session.
//!
//! The checks that need the database (space status, overlapping bookings)
//! are resolved by the caller and passed to [`check_space_bookable`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CoreError;
use crate::status::{EspaceStatus, EventLocationType};
use crate::types::{Cents, DbId};

/// Raw event input, as submitted by an organizer or an admin.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub capacity: Option<i32>,
    pub price_cents: Option<Cents>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub location_type: Option<EventLocationType>,
    pub space_id: Option<DbId>,
    pub external_address: Option<String>,
    pub location_label: Option<String>,
    pub garderie_required: bool,
    pub garderie_price_cents: Option<Cents>,
    pub garderie_capacity: Option<i32>,
    pub garderie_min_age: Option<i32>,
    pub garderie_max_age: Option<i32>,
}

/// Where a validated event takes place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedLocation {
    /// One of the association's spaces; the label is the space name.
    Space(DbId),
    /// An outside address, used as the event's location label.
    External(String),
}

impl PlannedLocation {
    pub fn location_type(&self) -> EventLocationType {
        match self {
            Self::Space(_) => EventLocationType::ExistingSpace,
            Self::External(_) => EventLocationType::External,
        }
    }
}

/// Childcare requested alongside an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedGarderie {
    pub capacity: i32,
    pub price_per_child_cents: Cents,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

/// An event that passed every database-independent check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub capacity: i32,
    pub location: PlannedLocation,
    pub garderie: Option<PlannedGarderie>,
}

/// Childcare session fields derived from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedSession {
    pub title: String,
    pub description: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub price_per_child_cents: Cents,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

/// Validate an event draft against the clock `now`.
pub fn plan_event(draft: &EventDraft, now: NaiveDateTime) -> Result<PlannedEvent, CoreError> {
    required_text(
        &draft.title,
        3,
        150,
        "Le titre doit contenir entre 3 et 150 caractères",
    )?;

    let (start, end) = match (draft.start, draft.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(CoreError::validation(
                "Les dates de début et de fin sont obligatoires",
            ))
        }
    };
    validate_dates(start, end, now)?;

    let capacity = match draft.capacity {
        Some(c) if c >= 1 => c,
        _ => {
            return Err(CoreError::validation(
                "La capacité doit être renseignée et positive",
            ))
        }
    };

    if draft.price_cents.is_some_and(|p| p < 0) {
        return Err(CoreError::validation("Le prix doit être positif"));
    }
    validate_ages(draft.min_age, draft.max_age)?;

    let location = resolve_location(draft)?;
    let garderie = resolve_garderie(draft)?;

    Ok(PlannedEvent {
        start,
        end,
        capacity,
        location,
        garderie,
    })
}

/// Check the dates of an event: both in the future, end after start.
pub fn validate_dates(
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), CoreError> {
    if start < now {
        return Err(CoreError::validation(
            "La date de début ne peut pas être dans le passé",
        ));
    }
    if end < now {
        return Err(CoreError::validation(
            "La date de fin ne peut pas être dans le passé",
        ));
    }
    if end <= start {
        return Err(CoreError::validation(
            "La date de fin doit être après la date de début",
        ));
    }
    Ok(())
}

/// Ages are optional, non-negative and ordered.
pub fn validate_ages(min_age: Option<i32>, max_age: Option<i32>) -> Result<(), CoreError> {
    if min_age.is_some_and(|a| a < 0) {
        return Err(CoreError::validation("L'âge minimum doit être positif"));
    }
    if max_age.is_some_and(|a| a < 0) {
        return Err(CoreError::validation("L'âge maximum doit être positif"));
    }
    if let (Some(min), Some(max)) = (min_age, max_age) {
        if max < min {
            return Err(CoreError::validation(
                "L'âge maximum doit être supérieur ou égal à l'âge minimum",
            ));
        }
    }
    Ok(())
}

/// Trim `value` and check that its length in characters is within
/// `min..=max`. Whitespace alone never counts.
pub fn required_text(
    value: &str,
    min: usize,
    max: usize,
    message: &str,
) -> Result<String, CoreError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 || len < min || len > max {
        return Err(CoreError::validation(message));
    }
    Ok(trimmed.to_string())
}

/// Whether `requested` more places fit next to the `booked` ones.
///
/// Computed in `i64` so an oversized request cannot wrap around.
pub fn fits_capacity(capacity: i32, booked: i64, requested: i32) -> bool {
    requested >= 0 && booked + i64::from(requested) <= i64::from(capacity)
}

/// Check that a space can host an event over the requested period.
pub fn check_space_bookable(
    status: EspaceStatus,
    reservation_overlap: bool,
    event_overlap: bool,
) -> Result<(), CoreError> {
    if status != EspaceStatus::Available {
        return Err(CoreError::conflict("Espace non disponible"));
    }
    if reservation_overlap {
        return Err(CoreError::conflict(
            "L'espace sélectionné est déjà réservé sur ce créneau",
        ));
    }
    if event_overlap {
        return Err(CoreError::conflict(
            "Un autre événement occupe déjà cet espace sur ce créneau",
        ));
    }
    Ok(())
}

/// Derive the childcare session attached to an event.
pub fn linked_session(
    event_title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    garderie: &PlannedGarderie,
) -> LinkedSession {
    LinkedSession {
        title: format!("Garderie pour event {event_title}"),
        description: format!("Garderie associée à l'événement {event_title}"),
        session_date: start.date(),
        start_time: start.time(),
        end_time: end.time(),
        capacity: garderie.capacity,
        price_per_child_cents: garderie.price_per_child_cents,
        min_age: garderie.min_age,
        max_age: garderie.max_age,
    }
}

fn resolve_location(draft: &EventDraft) -> Result<PlannedLocation, CoreError> {
    match draft.location_type.unwrap_or_default() {
        EventLocationType::ExistingSpace => draft
            .space_id
            .map(PlannedLocation::Space)
            .ok_or_else(|| CoreError::validation("Un espace existant doit être sélectionné")),
        EventLocationType::External => non_blank(draft.external_address.as_deref())
            .or_else(|| non_blank(draft.location_label.as_deref()))
            .map(|address| PlannedLocation::External(address.to_string()))
            .ok_or_else(|| CoreError::validation("Une adresse externe est requise")),
    }
}

fn resolve_garderie(draft: &EventDraft) -> Result<Option<PlannedGarderie>, CoreError> {
    if !draft.garderie_required {
        return Ok(None);
    }
    let capacity = match draft.garderie_capacity {
        Some(c) if c >= 1 => c,
        _ => {
            return Err(CoreError::validation(
                "Le nombre de places de la garderie est requis",
            ))
        }
    };
    let price_per_child_cents = match draft.garderie_price_cents {
        Some(p) if p >= 0 => p,
        _ => return Err(CoreError::validation("Le prix de la garderie est requis")),
    };
    validate_ages(draft.garderie_min_age, draft.garderie_max_age)?;

    Ok(Some(PlannedGarderie {
        capacity,
        price_per_child_cents,
        min_age: draft.garderie_min_age,
        max_age: draft.garderie_max_age,
    }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
