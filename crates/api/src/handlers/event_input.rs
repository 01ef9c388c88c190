//! Event submission body shared by the organizer and admin handlers, and
//! its translation into repository input.

use cercle_core::event_planning::{self, EventDraft, PlannedLocation};
use cercle_core::pricing::euros_to_cents;
use cercle_core::status::{EventLocationType, EventStatus, GarderieSessionStatus};
use cercle_core::types::{DbId, LocalDateTime};
use cercle_db::models::event::EventFields;
use cercle_db::models::garderie::GarderieSessionInput;
use cercle_db::repositories::{EspaceRepo, EventRepo, ReservationRepo};
use serde::Deserialize;
use validator::Validate;

use super::{local_now, parse_status};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for creating or editing an event.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 3, max = 150, message = "Le titre doit contenir entre 3 et 150 caractères"))]
    pub title: String,
    #[validate(length(max = 500, message = "La description ne peut dépasser 500 caractères"))]
    pub description: Option<String>,
    pub start_date_time: Option<LocalDateTime>,
    pub end_date_time: Option<LocalDateTime>,
    pub capacity: Option<i32>,
    /// Price per participant in euros.
    pub price: Option<f64>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    /// Honoured on admin endpoints only.
    pub status: Option<EventStatus>,
    pub location_type: Option<EventLocationType>,
    pub space_id: Option<DbId>,
    pub external_address: Option<String>,
    /// Free-form location label, used when no external address is given.
    pub location: Option<String>,
    #[serde(default)]
    pub garderie_required: bool,
    pub garderie_price: Option<f64>,
    pub garderie_capacity: Option<i32>,
    pub garderie_min_age: Option<i32>,
    pub garderie_max_age: Option<i32>,
}

/// Validated event ready for the repository.
#[derive(Debug, Clone)]
pub struct PlannedInput {
    pub fields: EventFields,
    pub garderie: Option<GarderieSessionInput>,
}

impl EventRequest {
    fn draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            start: self.start_date_time,
            end: self.end_date_time,
            capacity: self.capacity,
            price_cents: self.price.map(euros_to_cents),
            min_age: self.min_age,
            max_age: self.max_age,
            location_type: self.location_type,
            space_id: self.space_id,
            external_address: self.external_address.clone(),
            location_label: self.location.clone(),
            garderie_required: self.garderie_required,
            garderie_price_cents: self.garderie_price.map(euros_to_cents),
            garderie_capacity: self.garderie_capacity,
            garderie_min_age: self.garderie_min_age,
            garderie_max_age: self.garderie_max_age,
        }
    }
}

/// Validate an event submission and resolve its location.
///
/// A space location must be available and free of reservations and of
/// other live events; `exclude_id` is the event being edited.
pub async fn plan(
    state: &AppState,
    request: &EventRequest,
    exclude_id: Option<DbId>,
) -> AppResult<PlannedInput> {
    request.validate()?;
    let draft = request.draft();
    let planned = event_planning::plan_event(&draft, local_now())?;

    let (space_id, external_address, location) = match &planned.location {
        PlannedLocation::Space(space_id) => {
            let espace = EspaceRepo::find_by_id(&state.pool, *space_id)
                .await?
                .ok_or_else(|| AppError::not_found("Espace", *space_id))?;
            let reservation_overlap = ReservationRepo::exists_overlapping(
                &state.pool,
                espace.id,
                planned.start,
                planned.end,
            )
            .await?;
            let event_overlap = EventRepo::exists_overlapping_for_space(
                &state.pool,
                espace.id,
                planned.start,
                planned.end,
                exclude_id,
            )
            .await?;
            event_planning::check_space_bookable(
                parse_status(&espace.status)?,
                reservation_overlap,
                event_overlap,
            )?;
            (Some(espace.id), None, Some(espace.name))
        }
        PlannedLocation::External(address) => (None, Some(address.clone()), Some(address.clone())),
    };

    let garderie = planned.garderie.as_ref().map(|g| {
        let session = event_planning::linked_session(&draft.title, planned.start, planned.end, g);
        GarderieSessionInput {
            title: session.title,
            description: Some(session.description),
            session_date: session.session_date,
            start_time: session.start_time,
            end_time: session.end_time,
            capacity: session.capacity,
            price_per_child_cents: session.price_per_child_cents,
            status: GarderieSessionStatus::Open.as_str().to_string(),
            min_age: session.min_age,
            max_age: session.max_age,
        }
    });

    Ok(PlannedInput {
        fields: EventFields {
            title: draft.title,
            description: draft.description,
            start_date_time: planned.start,
            end_date_time: planned.end,
            capacity: planned.capacity,
            price_cents: draft.price_cents,
            min_age: draft.min_age,
            max_age: draft.max_age,
            location_type: planned.location.location_type().as_str().to_string(),
            space_id,
            external_address,
            location,
            garderie_required: garderie.is_some(),
        },
        garderie,
    })
}
