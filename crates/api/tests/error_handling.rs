//! Integration tests for the shape of error responses.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_user, get, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_not_found_body_shape(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/public/events/424242").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["status"], 404);
    assert!(json["message"].is_string());
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_validation_error_body_shape(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/auth/register",
        json!({ "firstName": "A", "lastName": "Martin", "email": "nope", "password": "supersecret" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["status"], 400);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unauthorized_body_shape(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/public/reservations/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["message"], "Non connecté");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_forbidden_body_shape(pool: PgPool) {
    let (_, token) = create_user(&pool, "member@example.org", "MEMBER").await;
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/admin/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
