#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use cercle_api::auth::jwt::{generate_access_token, JwtConfig};
use cercle_api::auth::password::hash_password;
use cercle_api::config::ServerConfig;
use cercle_api::payments::{
    NewPaymentIntent, PaymentConfig, PaymentError, PaymentGateway, PaymentIntent, PaymentVerifier,
};
use cercle_api::routes;
use cercle_api::state::AppState;
use cercle_db::models::espace::{Espace, EspaceInput};
use cercle_db::models::user::{CreateUser, User};
use cercle_db::repositories::{EspaceRepo, UserRepo};

pub const TEST_PASSWORD: &str = "motdepasse123";

/// Build a test `ServerConfig` with safe defaults and fake payments enabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_mins: 60,
        },
        payments: PaymentConfig {
            secret_key: String::new(),
            public_key: "pk_test_cercle".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            allow_fake_payments: true,
            currency: "eur".to_string(),
        },
    }
}

/// Provider stand-in: `pi_ok*` ids are settled, every other id is unknown.
/// Created intents echo the amount back in their client secret.
pub struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, intent: &NewPaymentIntent) -> Result<PaymentIntent, PaymentError> {
        Ok(PaymentIntent {
            id: "pi_created".to_string(),
            status: "requires_payment_method".to_string(),
            amount: intent.amount_cents,
            client_secret: Some(format!("pi_created_secret_{}", intent.amount_cents)),
        })
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        if id.starts_with("pi_ok") {
            Ok(PaymentIntent {
                id: id.to_string(),
                status: "succeeded".to_string(),
                amount: 0,
                client_secret: None,
            })
        } else {
            Err(PaymentError::Provider {
                status: 404,
                message: format!("No such payment_intent: '{id}'"),
            })
        }
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let payments = Arc::new(PaymentVerifier::new(
        Arc::new(FakeGateway),
        config.payments.allow_fake_payments,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        payments,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an active user with `role` and return it with a bearer token.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Test".to_string(),
            last_name: role.to_lowercase(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
            status: "ACTIVE".to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = generate_access_token(user.id, &user.role, &user.email, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

pub async fn create_espace(pool: &PgPool, name: &str, espace_type: &str, hourly_cents: i64) -> Espace {
    EspaceRepo::create(
        pool,
        &EspaceInput {
            name: name.to_string(),
            espace_type: Some(espace_type.to_string()),
            capacity: Some(40),
            base_price_cents: hourly_cents,
            status: "AVAILABLE".to_string(),
        },
    )
    .await
    .expect("espace creation should succeed")
}

/// `days` days from now at `hour`:00, local time.
pub fn future_at(days: i64, hour: u32) -> NaiveDateTime {
    (chrono::Local::now().naive_local() + ChronoDuration::days(days))
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Wire format of a local date-time.
pub fn wire(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
