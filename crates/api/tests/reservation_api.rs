//! Integration tests for space reservations and availability.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_espace, create_user, delete_auth, future_at, get,
    get_auth, post_json, post_json_auth, wire,
};
use serde_json::json;
use sqlx::PgPool;

fn booking(espace_id: i64, days: i64, from: u32, to: u32) -> serde_json::Value {
    json!({
        "espaceId": espace_id,
        "startDateTime": wire(future_at(days, from)),
        "endDateTime": wire(future_at(days, to)),
        "paymentIntentId": "test_pi_1"
    })
}

// ---------------------------------------------------------------------------
// Test: Standard spaces
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reserve_space_confirmed_with_server_price(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;
    let app = build_test_app(pool);

    let response =
        post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 10, 12), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONFIRMED");
    assert_eq!(json["totalPrice"], 40.0);
    assert_eq!(json["espace"]["name"], "Salle A");
    assert_eq!(json["paymentIntentId"], "test_pi_1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reserve_requires_authentication(pool: PgPool) {
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;
    let app = build_test_app(pool);

    let response = post_json(app, "/api/public/reservations", booking(espace.id, 3, 10, 12)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_overlapping_reservation_conflicts(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;

    let app = build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 10, 12), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 11, 13), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Touching intervals do not overlap.
    let app = build_test_app(pool);
    let response =
        post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 12, 13), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_client_total_mismatch_rejected(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;
    let app = build_test_app(pool);

    let mut body = booking(espace.id, 3, 10, 12);
    body["totalPrice"] = json!(1.0);
    let response = post_json_auth(app, "/api/public/reservations", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Montant invalide");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unpaid_reservation_rejected(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;
    let app = build_test_app(pool);

    let mut body = booking(espace.id, 3, 10, 12);
    body["paymentIntentId"] = json!("pi_unknown");
    let response = post_json_auth(app, "/api/public/reservations", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_auditorium_on_standard_endpoint_rejected(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let auditoire = create_espace(&pool, "Auditoire", "AUDITOIRE", 5000).await;
    let app = build_test_app(pool);

    let response =
        post_json_auth(app, "/api/public/reservations", booking(auditoire.id, 3, 10, 12), &token)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: Auditorium workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_auditorium_request_approve_then_pay(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let auditoire = create_espace(&pool, "Auditoire", "AUDITOIRE", 5000).await;

    let mut body = booking(auditoire.id, 5, 14, 16);
    body["justification"] = json!("Conférence annuelle");
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/public/reservations/auditorium", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "PENDING_APPROVAL");
    let id = json["id"].as_i64().unwrap();

    // Paying before approval is refused.
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/public/reservations/{id}/pay"),
        json!({ "paymentIntentId": "test_pay" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/admin/reservations/{id}/approve"),
        json!({ "approved": true }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/public/reservations/{id}/pay"),
        json!({ "paymentIntentId": "test_pay" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONFIRMED");
    assert_eq!(json["paymentIntentId"], "test_pay");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_auditorium_requires_justification(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let auditoire = create_espace(&pool, "Auditoire", "AUDITOIRE", 5000).await;
    let app = build_test_app(pool);

    let mut body = booking(auditoire.id, 5, 14, 16);
    body["justification"] = json!("   ");
    let response = post_json_auth(app, "/api/public/reservations/auditorium", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_auditorium_frees_the_slot(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let auditoire = create_espace(&pool, "Auditoire", "AUDITOIRE", 5000).await;

    let mut body = booking(auditoire.id, 5, 14, 16);
    body["justification"] = json!("Réunion");
    let app = build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/public/reservations/auditorium", body.clone(), &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/admin/reservations/{id}/approve"),
        json!({ "approved": false, "rejectionReason": "Indisponible" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "REJECTED");
    assert_eq!(json["rejectionReason"], "Indisponible");

    let app = build_test_app(pool);
    let response = post_json_auth(app, "/api/public/reservations/auditorium", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: Listing and cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_my_reservations_and_cancel(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;

    let app = build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 10, 12), &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/public/reservations/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let app = build_test_app(pool.clone());
    let response =
        delete_auth(app, &format!("/api/public/reservations/{id}/cancel"), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/public/reservations/{id}/cancel"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A second cancellation is refused.
    let app = build_test_app(pool);
    let response = delete_auth(app, &format!("/api/public/reservations/{id}/cancel"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_reservations_visible_to_owner_and_admin_only(pool: PgPool) {
    let (member, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let uri = format!("/api/public/reservations/user/{}", member.id);

    let app = build_test_app(pool.clone());
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::OK);
    let app = build_test_app(pool.clone());
    assert_eq!(get_auth(app, &uri, &other_token).await.status(), StatusCode::FORBIDDEN);
    let app = build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &admin_token).await.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_availability_calendar_and_day_slots(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let espace = create_espace(&pool, "Salle A", "SALLE", 2000).await;

    let app = build_test_app(pool.clone());
    post_json_auth(app, "/api/public/reservations", booking(espace.id, 3, 10, 12), &token).await;

    let app = build_test_app(pool.clone());
    let uri = format!(
        "/api/public/reservations/check-availability?espaceId={}&startDateTime={}&endDateTime={}",
        espace.id,
        wire(future_at(3, 11)),
        wire(future_at(3, 12)),
    );
    assert_eq!(body_json(get(app, &uri).await).await, json!(false));

    let app = build_test_app(pool.clone());
    let uri = format!(
        "/api/public/reservations/check-availability?espaceId={}&startDateTime={}&endDateTime={}",
        espace.id,
        wire(future_at(3, 12)),
        wire(future_at(3, 14)),
    );
    assert_eq!(body_json(get(app, &uri).await).await, json!(true));

    let day = future_at(3, 0);
    let app = build_test_app(pool.clone());
    let uri = format!(
        "/api/public/reservations/espace/{}/calendar?year={}&month={}",
        espace.id,
        day.format("%Y"),
        day.format("%-m"),
    );
    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let app = build_test_app(pool);
    let uri = format!(
        "/api/public/reservations/espace/{}/day-slots?date={}",
        espace.id,
        day.format("%Y-%m-%d"),
    );
    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["status"], "partial");
    let slots = json["slots"].as_array().unwrap();
    let status_at = |hour: u64| {
        slots
            .iter()
            .find(|s| s["hour"] == hour)
            .map(|s| s["status"].clone())
            .unwrap()
    };
    assert_eq!(status_at(10), "reserved");
    assert_eq!(status_at(11), "reserved");
    assert_eq!(status_at(12), "available");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_public_espaces_lists_available_only(pool: PgPool) {
    create_espace(&pool, "Salle A", "SALLE", 2000).await;
    cercle_db::repositories::EspaceRepo::create(
        &pool,
        &cercle_db::models::espace::EspaceInput {
            name: "Salle fermée".to_string(),
            espace_type: Some("SALLE".to_string()),
            capacity: None,
            base_price_cents: 1000,
            status: "MAINTENANCE".to_string(),
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/public/espaces").await).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Salle A"]);
}
