//! Integration tests for childcare sessions and bookings.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_user, delete_auth, future_at, get, get_auth,
    post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn session_body(days: i64, capacity: i32, status: &str) -> serde_json::Value {
    json!({
        "title": "Garderie du mercredi",
        "sessionDate": future_at(days, 0).format("%Y-%m-%d").to_string(),
        "startTime": "14:00:00",
        "endTime": "17:00:00",
        "capacity": capacity,
        "pricePerChild": 4.5,
        "status": status,
        "minAge": 3,
        "maxAge": 10
    })
}

async fn create_session(pool: &PgPool, admin_token: &str, body: serde_json::Value) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/garderie/sessions", body, admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn book(pool: &PgPool, token: &str, body: serde_json::Value) -> axum::response::Response {
    let app = build_test_app(pool.clone());
    post_json_auth(app, "/api/public/garderie/reservations", body, token).await
}

// ---------------------------------------------------------------------------
// Test: Session management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_session_crud(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let id = create_session(&pool, &admin_token, session_body(4, 10, "OPEN")).await;
    let uri = format!("/api/admin/garderie/sessions/{id}");

    let app = build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &admin_token).await).await;
    assert_eq!(json["pricePerChild"], 4.5);
    assert_eq!(json["availablePlaces"], 10);

    let mut body = session_body(4, 12, "CLOSED");
    body["title"] = json!("Garderie renommée");
    let app = build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Garderie renommée");
    assert_eq!(json["status"], "CLOSED");
    assert_eq!(json["capacity"], 12);

    let app = build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &admin_token).await.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &admin_token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_times_and_ages_validated(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;

    let mut body = session_body(4, 10, "OPEN");
    body["endTime"] = json!("13:00:00");
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/garderie/sessions", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = session_body(4, 10, "OPEN");
    body["minAge"] = json!(8);
    body["maxAge"] = json!(4);
    let app = build_test_app(pool);
    let response = post_json_auth(app, "/api/admin/garderie/sessions", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_session_title_rejected(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;

    let mut body = session_body(4, 10, "OPEN");
    body["title"] = json!("      ");
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/garderie/sessions", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Le titre est obligatoire (150 caractères max)"
    );

    let app = build_test_app(pool);
    let json = body_json(get_auth(app, "/api/admin/garderie/sessions", &admin_token).await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_public_sessions_lists_open_only(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    create_session(&pool, &admin_token, session_body(4, 10, "OPEN")).await;
    create_session(&pool, &admin_token, session_body(5, 10, "CLOSED")).await;
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/public/garderie/sessions").await).await;
    let sessions = json.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["status"], "OPEN");
}

// ---------------------------------------------------------------------------
// Test: Booking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_book_session_and_capacity_limit(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "parent@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let id = create_session(&pool, &admin_token, session_body(4, 3, "OPEN")).await;

    let response = book(
        &pool,
        &token,
        json!({ "sessionId": id, "numberOfChildren": 2, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONFIRMED");
    assert_eq!(json["totalPrice"], 9.0);

    let response = book(
        &pool,
        &other_token,
        json!({ "sessionId": id, "numberOfChildren": 2, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Capacité insuffisante. Places restantes : 1"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_oversized_children_count_rejected(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "parent@example.org", "MEMBER").await;
    let id = create_session(&pool, &admin_token, session_body(4, 3, "OPEN")).await;

    let response = book(
        &pool,
        &token,
        json!({ "sessionId": id, "numberOfChildren": i32::MAX, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Nombre d'enfants invalide");

    let app = build_test_app(pool);
    let response = get(app, "/api/public/garderie/sessions").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await[0]["availablePlaces"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_closed_session_and_missing_payment_rejected(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "parent@example.org", "MEMBER").await;
    let closed = create_session(&pool, &admin_token, session_body(4, 10, "CLOSED")).await;
    let open = create_session(&pool, &admin_token, session_body(5, 10, "OPEN")).await;

    let response = book(
        &pool,
        &token,
        json!({ "sessionId": closed, "numberOfChildren": 1, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Session non ouverte à la réservation"
    );

    let response = book(&pool, &token, json!({ "sessionId": open, "numberOfChildren": 1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Paiement manquant");

    let response = book(
        &pool,
        &token,
        json!({ "sessionId": open, "numberOfChildren": 0, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_childcare_booking(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "parent@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let id = create_session(&pool, &admin_token, session_body(4, 3, "OPEN")).await;

    let response = book(
        &pool,
        &token,
        json!({ "sessionId": id, "numberOfChildren": 3, "paymentIntentId": "test_pi" }),
    )
    .await;
    let booking_id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/public/garderie/reservations/{booking_id}/cancel");

    let app = build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &other_token).await.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    // The places are free again.
    let response = book(
        &pool,
        &other_token,
        json!({ "sessionId": id, "numberOfChildren": 3, "paymentIntentId": "test_pi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
