//! Status vocabularies for every bookable entity.
//!
//! Values are stored as TEXT in the database (guarded by CHECK constraints)
//! and travel over the wire in SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};

/// Declares a status enum with its database string mapping.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $all:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        /// All valid database values, in declaration order.
        pub const $all: &[&str] = &[$($value),+];

        impl $name {
            /// Convert to the database string value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            /// Convert from a database string value.
            pub fn from_str_value(s: &str) -> Result<Self, String> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    _ => Err(format!(
                        "Statut invalide '{s}'. Valeurs possibles: {}",
                        $all.join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str_value(s)
            }
        }
    };
}

status_enum! {
    /// Whether a space can currently be booked.
    EspaceStatus, VALID_ESPACE_STATUSES {
        Available => "AVAILABLE",
        Unavailable => "UNAVAILABLE",
        Maintenance => "MAINTENANCE",
    }
}

status_enum! {
    /// Kind of space. Auditoriums go through admin approval.
    EspaceType, VALID_ESPACE_TYPES {
        Salle => "SALLE",
        Auditoire => "AUDITOIRE",
        Terrain => "TERRAIN",
        Local => "LOCAL",
    }
}

status_enum! {
    /// Lifecycle of a space reservation.
    ReservationStatus, VALID_RESERVATION_STATUSES {
        Pending => "PENDING",
        /// Auditorium request awaiting an admin decision.
        PendingApproval => "PENDING_APPROVAL",
        /// Approved by an admin, awaiting payment.
        Approved => "APPROVED",
        Confirmed => "CONFIRMED",
        Cancelled => "CANCELLED",
        Rejected => "REJECTED",
    }
}

status_enum! {
    /// Lifecycle of an event.
    EventStatus, VALID_EVENT_STATUSES {
        PendingApproval => "PENDING_APPROVAL",
        Published => "PUBLISHED",
        Cancelled => "CANCELLED",
        Rejected => "REJECTED",
    }
}

status_enum! {
    /// Where an event takes place.
    EventLocationType, VALID_LOCATION_TYPES {
        ExistingSpace => "EXISTING_SPACE",
        External => "EXTERNAL",
    }
}

status_enum! {
    /// Event registrations and garderie reservations share this lifecycle.
    BookingStatus, VALID_BOOKING_STATUSES {
        Confirmed => "CONFIRMED",
        Cancelled => "CANCELLED",
    }
}

status_enum! {
    /// Lifecycle of a childcare session.
    GarderieSessionStatus, VALID_GARDERIE_SESSION_STATUSES {
        Open => "OPEN",
        Closed => "CLOSED",
        Cancelled => "CANCELLED",
    }
}

impl ReservationStatus {
    /// Statuses that hold a slot on the space calendar.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Rejected)
    }
}

impl Default for EventLocationType {
    fn default() -> Self {
        Self::External
    }
}
