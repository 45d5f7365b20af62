//! HTTP API tests.
//!
//! Drives the full router over the in-memory stores and asserts the wire
//! contract: endpoint shapes, status codes, and machine-readable error
//! codes.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code uses unwrap/expect

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use seatwise_core::memory::{MemoryCatalog, MemoryLedger, MemoryUserStore};
use seatwise_core::user::UserStore;
use seatwise_core::{
    BookingService, Clock, EventCatalog, FixedClock, Identity, NewEvent, Role, User, UserId,
};
use seatwise_server::{build_router, AppState, StaticTokenDirectory};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";
const ADMIN_TOKEN: &str = "admin-token";

struct TestApp {
    router: Router,
    catalog: Arc<MemoryCatalog>,
    alice: UserId,
}

async fn test_app() -> TestApp {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::new(now));
    let catalog = Arc::new(MemoryCatalog::new(clock.clone()));
    let ledger = Arc::new(MemoryLedger::new(catalog.clone(), clock.clone()));
    let users = Arc::new(MemoryUserStore::new());
    let service = BookingService::new(catalog.clone(), ledger);

    let alice = UserId::new();
    let bob = UserId::new();
    let admin = UserId::new();

    users
        .upsert(User {
            id: alice,
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Rivera".to_string(),
            role: Role::Attendee,
            created_at: clock.now(),
        })
        .await
        .expect("user seeding failed");

    let identity = Arc::new(StaticTokenDirectory::new([
        (ALICE_TOKEN.to_string(), Identity::attendee(alice)),
        (BOB_TOKEN.to_string(), Identity::attendee(bob)),
        (ADMIN_TOKEN.to_string(), Identity::admin(admin)),
    ]));

    let state = AppState::new(service, catalog.clone(), users, identity, clock);
    TestApp {
        router: build_router(state),
        catalog,
        alice,
    }
}

async fn seed_event(app: &TestApp, title: &str, starts_in_hours: i64, seats: u32) -> String {
    let starts_at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
        + Duration::hours(starts_in_hours);
    app.catalog
        .create(NewEvent {
            title: title.to_string(),
            description: "An evening of live music".to_string(),
            starts_at,
            time_window: "06:00 PM - 11:00 PM".to_string(),
            location: "Town Hall".to_string(),
            tags: vec!["music".to_string()],
            total_seats: seats,
            image_url: "https://img.example/gala.jpg".to_string(),
        })
        .await
        .expect("event seeding failed")
        .id
        .to_string()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn booking_body(event_id: &str, seats: u32) -> Value {
    json!({ "eventId": event_id, "numberOfSeats": seats })
}

#[tokio::test]
async fn event_listings_are_public_and_split_by_start() {
    let app = test_app().await;
    seed_event(&app, "Evening gala", 6, 10).await;
    seed_event(&app, "Morning yoga", -6, 10).await;

    let (status, body) = send(&app.router, request("GET", "/events", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, upcoming) = send(&app.router, request("GET", "/events/upcoming", None, None)).await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    assert_eq!(upcoming[0]["title"], "Evening gala");
    assert_eq!(upcoming[0]["totalSeats"], 10);

    let (_, past) = send(&app.router, request("GET", "/events/past", None, None)).await;
    assert_eq!(past[0]["title"], "Morning yoga");
}

#[tokio::test]
async fn booking_requires_a_known_bearer_token() {
    let app = test_app().await;
    let event_id = seed_event(&app, "Evening gala", 6, 10).await;

    let (status, _) = send(
        &app.router,
        request("POST", "/bookings", None, Some(booking_body(&event_id, 1))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some("mallory-token"),
            Some(booking_body(&event_id, 1)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reserve_round_trip_updates_availability() {
    let app = test_app().await;
    let event_id = seed_event(&app, "Evening gala", 6, 10).await;

    let (status, booking) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&event_id, 2)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["numberOfSeats"], 2);
    assert_eq!(booking["status"], "active");
    assert_eq!(booking["eventId"], event_id.as_str());

    let (_, detail) = send(
        &app.router,
        request("GET", &format!("/events/{event_id}"), None, None),
    )
    .await;
    assert_eq!(detail["availableSeats"], 8);

    let (_, availability) = send(
        &app.router,
        request("GET", &format!("/events/{event_id}/availability"), None, None),
    )
    .await;
    assert_eq!(availability["availableSeats"], 8);

    let (status, mine) = send(
        &app.router,
        request("GET", "/bookings/my-bookings", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["userId"], app.alice.to_string());
}

#[tokio::test]
async fn ledger_rejections_surface_as_400_with_codes() {
    let app = test_app().await;
    let event_id = seed_event(&app, "Evening gala", 6, 4).await;
    let past_id = seed_event(&app, "Morning yoga", -6, 4).await;

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&event_id, 5)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SEAT_COUNT");

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&past_id, 1)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EVENT_ENDED");

    // Fill the event, then lose the capacity race.
    let (status, _) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&event_id, 4)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(BOB_TOKEN),
            Some(booking_body(&event_id, 1)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_CAPACITY");

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&uuid::Uuid::new_v4().to_string(), 1)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn cancellation_is_owner_or_admin_only_and_single_shot() {
    let app = test_app().await;
    let event_id = seed_event(&app, "Evening gala", 6, 4).await;

    let (_, booking) = send(
        &app.router,
        request(
            "POST",
            "/bookings",
            Some(ALICE_TOKEN),
            Some(booking_body(&event_id, 4)),
        ),
    )
    .await;
    let booking_uri = format!("/bookings/{}", booking["id"].as_str().unwrap());

    // A stranger can neither read nor cancel it.
    let (status, _) = send(&app.router, request("GET", &booking_uri, Some(BOB_TOKEN), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(
        &app.router,
        request("DELETE", &booking_uri, Some(BOB_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // The owner cancels; the seats come back.
    let (status, _) = send(
        &app.router,
        request("DELETE", &booking_uri, Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, availability) = send(
        &app.router,
        request("GET", &format!("/events/{event_id}/availability"), None, None),
    )
    .await;
    assert_eq!(availability["availableSeats"], 4);

    // Cancelling twice reports the conflict.
    let (status, body) = send(
        &app.router,
        request("DELETE", &booking_uri, Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_CANCELLED");

    // The cancelled booking still shows up in history.
    let (_, mine) = send(
        &app.router,
        request("GET", "/bookings/my-bookings", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(mine[0]["status"], "cancelled");
}

#[tokio::test]
async fn administrative_surface_is_role_gated() {
    let app = test_app().await;

    let event = json!({
        "title": "Evening gala",
        "description": "An evening of live music",
        "date": "2026-08-01T18:00:00Z",
        "time": "06:00 PM - 11:00 PM",
        "location": "Town Hall",
        "tags": ["music"],
        "totalSeats": 20,
        "image": "https://img.example/gala.jpg"
    });

    let (status, _) = send(
        &app.router,
        request("POST", "/events", Some(ALICE_TOKEN), Some(event.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app.router,
        request("POST", "/events", Some(ADMIN_TOKEN), Some(event)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_uri = format!("/events/{}", created["id"].as_str().unwrap());

    // Capacity is immutable after creation.
    let (status, body) = send(
        &app.router,
        request(
            "PATCH",
            &event_uri,
            Some(ADMIN_TOKEN),
            Some(json!({ "totalSeats": 50 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CAPACITY_IMMUTABLE");

    // Other fields update normally.
    let (status, updated) = send(
        &app.router,
        request(
            "PATCH",
            &event_uri,
            Some(ADMIN_TOKEN),
            Some(json!({ "title": "Evening gala, extended" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Evening gala, extended");
    assert_eq!(updated["totalSeats"], 20);

    // Listing every booking is admin-only.
    let (status, _) = send(&app.router, request("GET", "/bookings", Some(ALICE_TOKEN), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app.router, request("GET", "/bookings", Some(ADMIN_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);

    // Retire hides the event.
    let (status, _) = send(
        &app.router,
        request("DELETE", &event_uri, Some(ADMIN_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app.router, request("GET", &event_uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn invalid_event_fields_are_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/events",
            Some(ADMIN_TOKEN),
            Some(json!({
                "title": "Gala",
                "description": "An evening of live music",
                "date": "2026-08-01T18:00:00Z",
                "time": "06:00 PM - 11:00 PM",
                "location": "Town Hall",
                "tags": ["music"],
                "totalSeats": 20,
                "image": "https://img.example/gala.jpg"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn profile_endpoint_returns_the_caller() {
    let app = test_app().await;

    let (status, body) = send(&app.router, request("GET", "/users/me", Some(ALICE_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "attendee");

    let (status, _) = send(&app.router, request("GET", "/users/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app().await;

    let (status, body) = send(&app.router, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app.router, request("GET", "/ready", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}
