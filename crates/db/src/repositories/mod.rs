//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement writes open
//! their own transaction.

pub mod espace_repo;
pub mod event_repo;
pub mod garderie_reservation_repo;
pub mod garderie_session_repo;
pub mod registration_repo;
pub mod reservation_repo;
pub mod stats_repo;
pub mod user_repo;

pub use espace_repo::EspaceRepo;
pub use event_repo::EventRepo;
pub use garderie_reservation_repo::GarderieReservationRepo;
pub use garderie_session_repo::GarderieSessionRepo;
pub use registration_repo::EventRegistrationRepo;
pub use reservation_repo::ReservationRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
