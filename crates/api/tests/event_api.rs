//! Integration tests for event submission, approval and registration.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_espace, create_user, delete_auth, future_at, get,
    get_auth, post_json_auth, put_json_auth, wire,
};
use serde_json::json;
use sqlx::PgPool;

fn external_event(title: &str, capacity: i32, price: f64) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Soirée ouverte à tous",
        "startDateTime": wire(future_at(10, 18)),
        "endDateTime": wire(future_at(10, 21)),
        "capacity": capacity,
        "price": price,
        "locationType": "EXTERNAL",
        "externalAddress": "Rue de la Loi 1, Bruxelles"
    })
}

/// Create an event as admin, which publishes it directly.
async fn published_event(pool: &PgPool, admin_token: &str, body: serde_json::Value) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/events", body, admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn register(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let app = build_test_app(pool.clone());
    post_json_auth(app, "/api/public/events/register", body, token).await
}

// ---------------------------------------------------------------------------
// Test: Submission and approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_organizer_submission_needs_approval(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Concert", 50, 10.0),
        &organizer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "PENDING_APPROVAL");
    assert_eq!(json["location"], "Rue de la Loi 1, Bruxelles");
    let id = json["id"].as_i64().unwrap();

    // Not public yet.
    let app = build_test_app(pool.clone());
    let response = get(app, &format!("/api/public/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/admin/events/pending", &admin_token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/admin/events/{id}/approve"),
        json!({ "approved": true }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "PUBLISHED");

    let app = build_test_app(pool);
    let json = body_json(get(app, "/api/public/events").await).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Concert"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_member_cannot_submit_events(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Concert", 50, 10.0),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_own_event_list_open_to_signed_in_users(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let (_, member_token) = create_user(&pool, "member@example.org", "MEMBER").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Concert", 50, 10.0),
        &organizer_token,
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/organizer/events/my", &member_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let app = build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/organizer/events/my/{id}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool);
    let response = get(app, "/api/organizer/events/my").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_event_title_rejected(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("     ", 50, 10.0),
        &organizer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Le titre doit contenir entre 3 et 150 caractères");

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("  Ab   ", 50, 10.0),
        &organizer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_event_resubmitted_after_edit(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Atelier", 20, 0.0),
        &organizer_token,
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/admin/events/{id}/approve"),
        json!({ "approved": false, "rejectionReason": "Description trop courte" }),
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "REJECTED");
    assert_eq!(json["rejectionReason"], "Description trop courte");

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/organizer/events/my/{id}"),
        external_event("Atelier cuisine", 20, 0.0),
        &organizer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "PENDING_APPROVAL");
    assert_eq!(json["title"], "Atelier cuisine");
    assert!(json["rejectionReason"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_organizer_cannot_edit_published_or_foreign_events(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let (_, other_token) = create_user(&pool, "orga2@example.org", "ORGANIZER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Concert", 50, 10.0),
        &organizer_token,
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/organizer/events/my/{id}");

    let app = build_test_app(pool.clone());
    let response = get_auth(app, &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/admin/events/{id}/approve"),
        json!({ "approved": true }),
        &admin_token,
    )
    .await;

    let app = build_test_app(pool);
    let response = put_json_auth(app, &uri, external_event("Concert", 60, 10.0), &organizer_token)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_event_in_the_past_rejected(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let app = build_test_app(pool);

    let mut body = external_event("Concert", 50, 10.0);
    body["startDateTime"] = json!(wire(future_at(-2, 18)));
    let response = post_json_auth(app, "/api/organizer/events", body, &organizer_token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "La date de début ne peut pas être dans le passé"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_event_on_reserved_space_conflicts(pool: PgPool) {
    let (_, member_token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let espace = create_espace(&pool, "Grande salle", "SALLE", 3000).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/public/reservations",
        json!({
            "espaceId": espace.id,
            "startDateTime": wire(future_at(10, 17)),
            "endDateTime": wire(future_at(10, 19)),
            "paymentIntentId": "test_pi"
        }),
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut body = external_event("Concert", 50, 10.0);
    body["locationType"] = json!("EXISTING_SPACE");
    body["spaceId"] = json!(espace.id);
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/events", body.clone(), &admin_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Another day is free, and the location label is the space name.
    body["startDateTime"] = json!(wire(future_at(11, 18)));
    body["endDateTime"] = json!(wire(future_at(11, 21)));
    let app = build_test_app(pool);
    let response = post_json_auth(app, "/api/admin/events", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["location"], "Grande salle");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_force_status_validates_value(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let id = published_event(&pool, &admin_token, external_event("Concert", 50, 10.0)).await;

    let app = build_test_app(pool.clone());
    let response = common::patch_auth(
        app,
        &format!("/api/admin/events/{id}/status?status=cancelled"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "CANCELLED");

    let app = build_test_app(pool);
    let response = common::patch_auth(
        app,
        &format!("/api/admin/events/{id}/status?status=bogus"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Statut invalide");
}

// ---------------------------------------------------------------------------
// Test: Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_free_event_registration_without_payment(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let id = published_event(&pool, &admin_token, external_event("Pique-nique", 10, 0.0)).await;

    let response = register(&pool, &token, json!({ "eventId": id, "numberOfParticipants": 2 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONFIRMED");
    assert_eq!(json["numberOfParticipants"], 2);
    assert_eq!(json["totalPrice"], 0.0);

    let app = build_test_app(pool);
    let json = body_json(get(app, &format!("/api/public/events/{id}")).await).await;
    assert_eq!(json["registeredCount"], 2);
    assert_eq!(json["availablePlaces"], 8);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_paid_event_requires_settled_payment(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let id = published_event(&pool, &admin_token, external_event("Concert", 10, 12.5)).await;

    let response = register(&pool, &token, json!({ "eventId": id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Paiement manquant");

    let response = register(
        &pool,
        &token,
        json!({ "eventId": id, "numberOfParticipants": 2, "paymentIntentId": "pi_ok_42" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["totalPrice"], 25.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_registration_and_capacity(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let id = published_event(&pool, &admin_token, external_event("Atelier", 3, 0.0)).await;

    let response = register(&pool, &token, json!({ "eventId": id, "numberOfParticipants": 2 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = register(&pool, &token, json!({ "eventId": id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Vous êtes déjà inscrit à cet événement"
    );

    let response =
        register(&pool, &other_token, json!({ "eventId": id, "numberOfParticipants": 2 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Capacité maximale atteinte");

    let response = register(&pool, &other_token, json!({ "eventId": id })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_oversized_participant_count_rejected(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let (_, other_token) = create_user(&pool, "other@example.org", "MEMBER").await;
    let id = published_event(&pool, &admin_token, external_event("Atelier", 5, 0.0)).await;

    let response = register(&pool, &token, json!({ "eventId": id, "numberOfParticipants": 1 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = register(
        &pool,
        &other_token,
        json!({ "eventId": id, "numberOfParticipants": i32::MAX }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Nombre de participants invalide");

    // Within the accepted range but above the remaining places.
    let response =
        register(&pool, &other_token, json!({ "eventId": id, "numberOfParticipants": 100 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Capacité maximale atteinte");

    let app = build_test_app(pool.clone());
    let response = get(app, &format!("/api/public/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["registeredCount"], 1);

    let app = build_test_app(pool);
    assert_eq!(get(app, "/api/public/events").await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_registration_with_childcare(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;

    let mut body = external_event("Conférence", 30, 5.0);
    body["garderieRequired"] = json!(true);
    body["garderiePrice"] = json!(3.0);
    body["garderieCapacity"] = json!(2);
    let id = published_event(&pool, &admin_token, body).await;

    let response = register(
        &pool,
        &token,
        json!({
            "eventId": id,
            "addChildcare": true,
            "numberOfChildren": 3,
            "paymentIntentId": "test_pi"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Capacité garderie insuffisante. Places restantes : 2"
    );

    let response = register(
        &pool,
        &token,
        json!({
            "eventId": id,
            "addChildcare": true,
            "numberOfChildren": 2,
            "paymentIntentId": "test_pi"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["totalPrice"], 5.0);

    // The childcare booking is listed separately with its own price.
    let app = build_test_app(pool);
    let json = body_json(get_auth(app, "/api/public/garderie/reservations/me", &token).await).await;
    let bookings = json.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["numberOfChildren"], 2);
    assert_eq!(bookings[0]["totalPrice"], 6.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_registration_on_unpublished_event_rejected(pool: PgPool) {
    let (_, organizer_token) = create_user(&pool, "orga@example.org", "ORGANIZER").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/organizer/events",
        external_event("Concert", 50, 0.0),
        &organizer_token,
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = register(&pool, &token, json!({ "eventId": id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Cet événement n'est pas ouvert aux inscriptions"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_registration_frees_places(pool: PgPool) {
    let (_, admin_token) = create_user(&pool, "admin@example.org", "ADMIN").await;
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let id = published_event(&pool, &admin_token, external_event("Atelier", 5, 0.0)).await;

    let response = register(&pool, &token, json!({ "eventId": id, "numberOfParticipants": 3 })).await;
    let registration_id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/public/events/registrations/{registration_id}/cancel"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/public/events/{id}")).await).await;
    assert_eq!(json["availablePlaces"], 5);

    let app = build_test_app(pool);
    let json = body_json(get_auth(app, "/api/public/events/registrations/me", &token).await).await;
    assert_eq!(json[0]["status"], "CANCELLED");
}
