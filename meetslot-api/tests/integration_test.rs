/// Integration tests for the MeetSlot API
///
/// These tests verify the full system end-to-end over HTTP:
/// - User creation with email uniqueness
/// - Conflict-checked appointment booking
/// - Outward status mapping for every error kind
///
/// They need a running PostgreSQL reachable via `DATABASE_URL` and are
/// ignored by default; run them serially against a disposable database:
///
/// ```bash
/// DATABASE_URL=postgresql://localhost/meetslot_test \
///     cargo test -p meetslot-api -- --ignored --test-threads=1
/// ```

mod common;

use axum::http::StatusCode;
use common::{create_user, response_json, TestContext};
use serde_json::json;

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_create_user_and_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();

    let alice_id = create_user(&ctx, "Alice", "a@x.com").await;
    assert_eq!(alice_id, 1);

    // Same email again → 409
    let response = ctx
        .post(
            "/api/v1/users",
            json!({ "name": "Other Alice", "email": "a@x.com", "role": "member" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_book_appointment_and_overlap_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_user(&ctx, "Alice", "a@x.com").await;
    let bob = create_user(&ctx, "Bob", "b@x.com").await;
    let carol = create_user(&ctx, "Carol", "c@x.com").await;

    // Booking a free slot succeeds with a pending appointment
    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": bob,
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T11:00:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = response_json(response).await;
    assert_eq!(created["status"], "pending");
    let appointment_id = created["id"].as_i64().unwrap();

    // Overlapping slot for a shared user → 409
    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": carol,
                "start_time": "2024-01-01T10:30:00Z",
                "end_time": "2024-01-01T11:30:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The booked appointment is readable and stable
    let response = ctx
        .get(&format!("/api/v1/appointments/{}", appointment_id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response_json(response).await;
    assert_eq!(fetched["id"].as_i64().unwrap(), appointment_id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_invalid_inputs_map_to_400() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_user(&ctx, "Alice", "a@x.com").await;
    let bob = create_user(&ctx, "Bob", "b@x.com").await;

    // Zero-length interval
    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": bob,
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T10:00:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Self-booking
    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": alice,
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T11:00:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed timestamp
    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": bob,
                "start_time": "tomorrow",
                "end_time": "2024-01-01T11:00:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_missing_participant_maps_to_404() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_user(&ctx, "Alice", "a@x.com").await;

    let response = ctx
        .post(
            "/api/v1/appointments",
            json!({
                "organizer_id": alice,
                "participant_id": 9999,
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T11:00:00Z",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing was persisted
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_get_missing_resources_map_to_404() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/api/v1/appointments/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.get("/api/v1/users/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.get("/api/v1/users/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_concurrent_overlapping_bookings_race() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_user(&ctx, "Alice", "a@x.com").await;
    let bob = create_user(&ctx, "Bob", "b@x.com").await;

    // Two overlapping bookings for the same pair, submitted concurrently:
    // the advisory locks in the conflict scan must let at most one commit.
    let first = {
        let app = ctx.app.clone();
        tokio::spawn(async move { post_booking(app, alice, bob, "10:00", "11:00").await })
    };
    let second = {
        let app = ctx.app.clone();
        tokio::spawn(async move { post_booking(app, alice, bob, "10:30", "11:30").await })
    };

    let statuses = [first.await.unwrap(), second.await.unwrap()];
    let created = statuses
        .iter()
        .filter(|status| **status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1, "exactly one of the racing bookings may win");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

async fn post_booking(
    mut app: axum::Router,
    organizer: i64,
    participant: i64,
    start: &str,
    end: &str,
) -> StatusCode {
    use axum::body::Body;
    use axum::http::Request;
    use tower::Service as _;

    let body = json!({
        "organizer_id": organizer,
        "participant_id": participant,
        "start_time": format!("2024-01-01T{start}:00Z"),
        "end_time": format!("2024-01-01T{end}:00Z"),
    });

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/appointments")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    app.call(request).await.unwrap().status()
}
