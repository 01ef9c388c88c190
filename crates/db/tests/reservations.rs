//! Repository tests for space reservations: overlap detection, the
//! approval guards and calendar queries.

use cercle_core::status::ReservationStatus;
use cercle_db::models::espace::EspaceInput;
use cercle_db::models::reservation::CreateReservation;
use cercle_db::models::user::CreateUser;
use cercle_db::repositories::{EspaceRepo, ReservationRepo, UserRepo};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

async fn seed(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Anne".to_string(),
            last_name: "Dupont".to_string(),
            email: "anne@cercle.be".to_string(),
            password_hash: "hash".to_string(),
            role: "MEMBER".to_string(),
            status: "ACTIVE".to_string(),
        },
    )
    .await
    .unwrap();
    let espace = EspaceRepo::create(
        pool,
        &EspaceInput {
            name: "Salle Polyvalente".to_string(),
            espace_type: Some("SALLE".to_string()),
            capacity: Some(40),
            base_price_cents: 2000,
            status: "AVAILABLE".to_string(),
        },
    )
    .await
    .unwrap();
    (user.id, espace.id)
}

fn booking(user_id: i64, espace_id: i64, start: NaiveDateTime, end: NaiveDateTime) -> CreateReservation {
    CreateReservation {
        user_id,
        espace_id,
        start_date_time: start,
        end_date_time: end,
        total_price_cents: 4000,
        status: "CONFIRMED".to_string(),
        payment_intent_id: Some("pi_test".to_string()),
        justification: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_overlapping_reservation_is_refused(pool: PgPool) {
    let (user_id, espace_id) = seed(&pool).await;

    let first = ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(10, 9), at(10, 11)))
        .await
        .unwrap();
    assert!(first.is_some());

    let clash = ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(10, 10), at(10, 12)))
        .await
        .unwrap();
    assert!(clash.is_none(), "Overlapping slot must be refused");

    // Touching intervals do not overlap.
    let adjacent = ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(10, 11), at(10, 12)))
        .await
        .unwrap();
    assert!(adjacent.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancelled_and_rejected_free_the_slot(pool: PgPool) {
    let (user_id, espace_id) = seed(&pool).await;

    let first = ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(11, 9), at(11, 11)))
        .await
        .unwrap()
        .unwrap();
    ReservationRepo::cancel(&pool, first.id).await.unwrap();
    assert!(!ReservationRepo::exists_overlapping(&pool, espace_id, at(11, 9), at(11, 11))
        .await
        .unwrap());

    let mut request = booking(user_id, espace_id, at(11, 9), at(11, 11));
    request.status = "PENDING_APPROVAL".to_string();
    let pending = ReservationRepo::create_if_free(&pool, &request).await.unwrap().unwrap();
    assert!(ReservationRepo::exists_overlapping(&pool, espace_id, at(11, 10), at(11, 12))
        .await
        .unwrap());

    ReservationRepo::record_decision(&pool, pending.id, ReservationStatus::Rejected, user_id, Some("Complet"))
        .await
        .unwrap()
        .unwrap();
    assert!(!ReservationRepo::exists_overlapping(&pool, espace_id, at(11, 10), at(11, 12))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decision_and_payment_are_guarded(pool: PgPool) {
    let (user_id, espace_id) = seed(&pool).await;
    let mut request = booking(user_id, espace_id, at(12, 14), at(12, 16));
    request.status = "PENDING_APPROVAL".to_string();
    request.payment_intent_id = None;
    request.justification = Some("Conférence annuelle".to_string());
    let pending = ReservationRepo::create_if_free(&pool, &request).await.unwrap().unwrap();

    // Cannot pay before approval.
    assert!(ReservationRepo::confirm_payment(&pool, pending.id, "pi_1")
        .await
        .unwrap()
        .is_none());

    let approved = ReservationRepo::record_decision(&pool, pending.id, ReservationStatus::Approved, user_id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, "APPROVED");
    assert_eq!(approved.approved_by, Some(user_id));
    assert!(approved.approved_at.is_some());

    // A second decision finds nothing pending.
    assert!(ReservationRepo::record_decision(&pool, pending.id, ReservationStatus::Rejected, user_id, Some("x"))
        .await
        .unwrap()
        .is_none());

    let paid = ReservationRepo::confirm_payment(&pool, pending.id, "pi_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.status, "CONFIRMED");
    assert_eq!(paid.payment_intent_id.as_deref(), Some("pi_1"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_calendar_lists_confirmed_in_month(pool: PgPool) {
    let (user_id, espace_id) = seed(&pool).await;
    ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(5, 9), at(5, 10)))
        .await
        .unwrap();
    let mut pending = booking(user_id, espace_id, at(6, 9), at(6, 10));
    pending.status = "PENDING_APPROVAL".to_string();
    ReservationRepo::create_if_free(&pool, &pending).await.unwrap();

    let (from, to) = cercle_core::availability::month_bounds(2030, 3).unwrap();
    let confirmed = ReservationRepo::list_confirmed_in_period(&pool, espace_id, from, to)
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].start_date_time, at(5, 9));

    let blocking = ReservationRepo::list_blocking_in_period(&pool, espace_id, from, to)
        .await
        .unwrap();
    assert_eq!(blocking.len(), 2);

    let (from, to) = cercle_core::availability::month_bounds(2030, 4).unwrap();
    assert!(ReservationRepo::list_confirmed_in_period(&pool, espace_id, from, to)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_space_cascades_to_reservations(pool: PgPool) {
    let (user_id, espace_id) = seed(&pool).await;
    let reservation = ReservationRepo::create_if_free(&pool, &booking(user_id, espace_id, at(7, 9), at(7, 10)))
        .await
        .unwrap()
        .unwrap();

    assert!(EspaceRepo::delete(&pool, espace_id).await.unwrap());
    assert!(ReservationRepo::find_by_id(&pool, reservation.id)
        .await
        .unwrap()
        .is_none());
}
