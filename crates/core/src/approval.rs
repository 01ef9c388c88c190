//! Approval workflows: organizer events and auditorium reservations.
//!
//! Each function takes the current state and returns the next one, so the
//! API layer only has to persist the outcome.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::CoreError;
use crate::status::{EventStatus, ReservationStatus};

/// An admin's verdict on a pending item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub approved: bool,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl Decision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            rejection_reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            rejection_reason: Some(reason.into()),
        }
    }

    fn trimmed_reason(&self) -> Option<String> {
        self.rejection_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}

/// Resulting state of a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<S> {
    pub status: S,
    /// Reason stored on the record; cleared on approval.
    pub rejection_reason: Option<String>,
}

/// Decide on an event submitted by an organizer.
///
/// Only `PENDING_APPROVAL` events can be decided. The rejection reason is
/// optional for events.
pub fn decide_event(
    current: EventStatus,
    decision: &Decision,
) -> Result<Outcome<EventStatus>, CoreError> {
    if current != EventStatus::PendingApproval {
        return Err(CoreError::validation(
            "Cet événement n'est pas en attente d'approbation",
        ));
    }
    Ok(if decision.approved {
        Outcome {
            status: EventStatus::Published,
            rejection_reason: None,
        }
    } else {
        Outcome {
            status: EventStatus::Rejected,
            rejection_reason: decision.trimmed_reason(),
        }
    })
}

/// Decide on an auditorium reservation request.
///
/// Approval moves the request to `APPROVED` (awaiting payment). Rejection
/// requires a non-blank reason.
pub fn decide_reservation(
    current: ReservationStatus,
    decision: &Decision,
) -> Result<Outcome<ReservationStatus>, CoreError> {
    if current != ReservationStatus::PendingApproval {
        return Err(CoreError::validation(
            "Cette réservation n'est pas en attente d'approbation",
        ));
    }
    if decision.approved {
        return Ok(Outcome {
            status: ReservationStatus::Approved,
            rejection_reason: None,
        });
    }
    let reason = decision
        .trimmed_reason()
        .ok_or_else(|| CoreError::validation("Une raison de rejet est requise"))?;
    Ok(Outcome {
        status: ReservationStatus::Rejected,
        rejection_reason: Some(reason),
    })
}

/// Status an organizer's edit leaves the event in.
///
/// Edits are allowed while pending or after a rejection; a rejected event
/// is resubmitted for approval.
pub fn status_after_organizer_edit(current: EventStatus) -> Result<EventStatus, CoreError> {
    match current {
        EventStatus::PendingApproval | EventStatus::Rejected => Ok(EventStatus::PendingApproval),
        _ => Err(CoreError::validation(
            "Seuls les événements en attente ou rejetés peuvent être modifiés",
        )),
    }
}

/// Initial status of an event created by a user with `role`.
pub fn initial_event_status(is_admin: bool) -> EventStatus {
    if is_admin {
        EventStatus::Published
    } else {
        EventStatus::PendingApproval
    }
}

/// Check that an approved auditorium reservation can now be paid.
pub fn check_payable(current: ReservationStatus) -> Result<(), CoreError> {
    if current != ReservationStatus::Approved {
        return Err(CoreError::validation(format!(
            "Cette réservation n'est pas en attente de paiement. Statut actuel: {current}"
        )));
    }
    Ok(())
}

/// Check that a space reservation can be cancelled by its owner.
pub fn check_reservation_cancellable(
    current: ReservationStatus,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), CoreError> {
    if start < now {
        return Err(CoreError::validation("La réservation est déjà passée"));
    }
    if current == ReservationStatus::Cancelled {
        return Err(CoreError::validation("Cette réservation est déjà annulée"));
    }
    Ok(())
}

/// Check that a booking (event registration or childcare) starting at
/// `start` can be cancelled.
pub fn check_booking_cancellable(
    already_cancelled: bool,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), CoreError> {
    if start < now {
        return Err(CoreError::validation("L'événement est déjà passé"));
    }
    if already_cancelled {
        return Err(CoreError::validation("Cette inscription est déjà annulée"));
    }
    Ok(())
}
