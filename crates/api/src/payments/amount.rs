//! Server-side amount of a payment request.
//!
//! The browser sends what it believes the amount is; the server recomputes
//! it from stored prices and refuses a mismatch.

use std::collections::BTreeMap;

use cercle_core::error::CoreError;
use cercle_core::pricing;
use cercle_core::types::{Cents, DbId};
use cercle_db::repositories::{EspaceRepo, EventRepo, GarderieSessionRepo, ReservationRepo};
use cercle_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Body of `POST /api/payments/create-payment-intent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in cents as computed by the client.
    pub amount: Option<Cents>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub reservation_type: Option<String>,
    pub reservation_id: Option<DbId>,
    pub hours: Option<f64>,
    pub number_of_participants: Option<i32>,
    pub session_id: Option<DbId>,
    pub event_id: Option<DbId>,
    pub espace_id: Option<DbId>,
    pub number_of_children: Option<i32>,
}

/// What a payment request pays for.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentTarget {
    Event {
        event_id: DbId,
        participants: i32,
        children: i32,
    },
    Garderie {
        session_id: DbId,
        children: i32,
    },
    /// An existing space reservation (auditorium awaiting payment).
    Reservation { reservation_id: DbId },
    /// A space booked for a number of hours.
    SpaceHours { espace_id: DbId, hours: Option<f64> },
}

impl PaymentRequest {
    /// Resolve the reservation type and ids into a [`PaymentTarget`].
    ///
    /// Types are matched case-insensitively; `SPACE`, `ESPACE`, `AUDITORIUM`
    /// and `AUDITOIRE` are synonyms.
    pub fn target(&self) -> Result<PaymentTarget, CoreError> {
        let kind = self
            .reservation_type
            .as_deref()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match (kind.as_str(), self.event_id, self.session_id) {
            ("EVENT", Some(event_id), _) => Ok(PaymentTarget::Event {
                event_id,
                participants: self.number_of_participants.unwrap_or(1),
                children: self.number_of_children.unwrap_or(0),
            }),
            ("GARDERIE", _, Some(session_id)) => Ok(PaymentTarget::Garderie {
                session_id,
                children: self.number_of_children.unwrap_or(1),
            }),
            ("SPACE" | "ESPACE" | "AUDITORIUM" | "AUDITOIRE", _, _) => {
                match (self.reservation_id, self.espace_id) {
                    (Some(reservation_id), _) => Ok(PaymentTarget::Reservation { reservation_id }),
                    (None, Some(espace_id)) => Ok(PaymentTarget::SpaceHours {
                        espace_id,
                        hours: self.hours,
                    }),
                    (None, None) => Err(invalid_request()),
                }
            }
            _ => Err(invalid_request()),
        }
    }

    /// Metadata attached to the payment intent.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        if let Some(kind) = &self.reservation_type {
            metadata.insert("reservationType".to_string(), kind.clone());
        }
        let ids = [
            ("reservationId", self.reservation_id),
            ("espaceId", self.espace_id),
            ("sessionId", self.session_id),
            ("eventId", self.event_id),
        ];
        for (key, value) in ids {
            if let Some(value) = value {
                metadata.insert(key.to_string(), value.to_string());
            }
        }
        if let Some(children) = self.number_of_children {
            metadata.insert("numberOfChildren".to_string(), children.to_string());
        }
        if let Some(participants) = self.number_of_participants {
            metadata.insert("numberOfParticipants".to_string(), participants.to_string());
        }
        metadata
    }
}

fn invalid_request() -> CoreError {
    CoreError::validation("Type de réservation invalide ou données manquantes")
}

/// Compute the amount due for `target` from stored prices.
pub async fn server_amount(pool: &DbPool, target: &PaymentTarget) -> AppResult<Cents> {
    match *target {
        PaymentTarget::Event {
            event_id,
            participants,
            children,
        } => {
            let event = EventRepo::find_by_id(pool, event_id)
                .await?
                .ok_or_else(|| AppError::not_found("Événement", event_id))?;
            let childcare = match (children > 0, event.garderie_session_id) {
                (true, Some(session_id)) => GarderieSessionRepo::find_by_id(pool, session_id)
                    .await?
                    .map(|session| (session.price_per_child_cents, children)),
                _ => None,
            };
            Ok(pricing::registration_total(
                event.price_cents,
                participants,
                childcare,
            ))
        }
        PaymentTarget::Garderie {
            session_id,
            children,
        } => {
            let session = GarderieSessionRepo::find_by_id(pool, session_id)
                .await?
                .ok_or_else(|| AppError::not_found("Session", session_id))?;
            Ok(pricing::garderie_price(session.price_per_child_cents, children))
        }
        PaymentTarget::Reservation { reservation_id } => {
            let reservation = ReservationRepo::find_by_id(pool, reservation_id)
                .await?
                .ok_or_else(|| AppError::not_found("Réservation", reservation_id))?;
            Ok(reservation.total_price_cents)
        }
        PaymentTarget::SpaceHours { espace_id, hours } => {
            let espace = EspaceRepo::find_by_id(pool, espace_id)
                .await?
                .ok_or_else(|| AppError::not_found("Espace", espace_id))?;
            Ok(pricing::space_price_for_hours(espace.base_price_cents, hours))
        }
    }
}
