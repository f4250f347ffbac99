/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for the HTTP-level tests:
/// - Test database setup (migrations + clean tables)
/// - Router construction over real Postgres adapters
/// - Request/response helpers

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use meetslot_api::app::{build_router, AppState};
use meetslot_api::config::Config;
use sqlx::PgPool;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a clean database
    ///
    /// Requires `DATABASE_URL` to point at a disposable test database.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        // Start each test from empty tables
        sqlx::query("TRUNCATE appointments, users RESTART IDENTITY CASCADE")
            .execute(&db)
            .await?;

        let app = build_router(AppState::new(db.clone(), config));

        Ok(Self { db, app })
    }

    /// Sends a JSON POST and returns the response
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a GET and returns the response
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        self.app.clone().call(request).await.unwrap()
    }
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a user over HTTP, asserting a 201, and returns its id
pub async fn create_user(ctx: &TestContext, name: &str, email: &str) -> i64 {
    let response = ctx
        .post(
            "/api/v1/users",
            serde_json::json!({
                "name": name,
                "email": email,
                "role": "member",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await["id"].as_i64().unwrap()
}
