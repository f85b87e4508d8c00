//! HTTP integration tests for the confirmation workflow router.
//!
//! The full router runs against the in-memory mocks, so every request
//! exercises the real handlers, extractors and error mapping.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code uses unwrap for clear failure messages

use axum_test::TestServer;
use bookingflow_core::mocks::{MemoryBookingStore, MockNotifier, MockPortalAuth, MockTicketing};
use bookingflow_core::{
    ConfirmationConfig, ConfirmationEngine, DeclineTaxonomy, ReminderPolicy, ReminderScheduler,
};
use bookingflow_web::{AppState, confirmation_router};
use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

struct TestApp {
    server: TestServer,
    store: MemoryBookingStore,
    notifier: MockNotifier,
    auth: MockPortalAuth,
}

fn test_app() -> TestApp {
    let store = MemoryBookingStore::new();
    let notifier = MockNotifier::new();
    let ticketing = MockTicketing::new();
    let auth = MockPortalAuth::new();

    let engine = ConfirmationEngine::new(
        store.clone(),
        DeclineTaxonomy::standard(),
        ConfirmationConfig::default(),
    );
    let scheduler = ReminderScheduler::new(
        store.clone(),
        notifier.clone(),
        ticketing.clone(),
        ReminderPolicy::default(),
    );
    let state = Arc::new(AppState::new(
        engine,
        scheduler,
        store.clone(),
        notifier.clone(),
        auth.clone(),
    ));

    TestApp {
        server: TestServer::new(confirmation_router(state)).unwrap(),
        store,
        notifier,
        auth,
    }
}

fn intake_body() -> Value {
    json!({
        "order_id": 4711,
        "order_item_id": 9001,
        "order_number": "100023545",
        "customer_number": "K12345",
        "customer_email": "partner@example.com",
        "course_title": "First Aid Basics",
        "course_date": (Utc::now() + Duration::days(21)).to_rfc3339(),
    })
}

/// Register a booking through the API and return its token.
async fn register_booking(app: &TestApp) -> String {
    let response = app.server.post("/api/v1/bookings").json(&intake_body()).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let bookings = app.store.get_all();
    assert_eq!(bookings.len(), 1);
    bookings[0].confirmation_token.clone()
}

#[tokio::test]
async fn register_persists_and_sends_confirmation_request() {
    let app = test_app();

    let response = app.server.post("/api/v1/bookings").json(&intake_body()).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    // The token never appears in the intake response.
    assert!(body.get("confirmation_token").is_none());

    assert_eq!(app.notifier.sent_requests().len(), 1);
}

#[tokio::test]
async fn token_landing_page_shows_pending_booking() {
    let app = test_app();
    let token = register_booking(&app).await;

    let response = app
        .server
        .get(&format!("/api/v1/confirmations/token/{token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["token_expired"], false);
    assert_eq!(body["order_number"], "100023545");
}

#[tokio::test]
async fn confirm_then_duplicate_click_reports_already_processed() {
    let app = test_app();
    let token = register_booking(&app).await;

    let response = app
        .server
        .post(&format!("/api/v1/confirmations/token/{token}/confirm"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["outcome"], "confirmed");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["resolved_by"], "email_token");

    // A duplicate click on the same link is benign.
    let response = app
        .server
        .post(&format!("/api/v1/confirmations/token/{token}/confirm"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["outcome"], "already_processed");
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn decline_reports_reason_and_actor() {
    let app = test_app();
    let token = register_booking(&app).await;

    let response = app
        .server
        .post(&format!("/api/v1/confirmations/token/{token}/decline"))
        .json(&json!({ "reason_code": "schedule_conflict" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["outcome"], "declined");
    assert_eq!(body["status"], "declined");
    assert_eq!(body["resolved_by"], "email_token");

    let stored = &app.store.get_all()[0];
    assert_eq!(stored.decline_reason.as_deref(), Some("schedule_conflict"));
    assert_eq!(stored.decline_notes, None);
}

#[tokio::test]
async fn decline_without_required_notes_is_unprocessable() {
    let app = test_app();
    let token = register_booking(&app).await;

    let response = app
        .server
        .post(&format!("/api/v1/confirmations/token/{token}/decline"))
        .json(&json!({ "reason_code": "other", "notes": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // No write happened.
    assert_eq!(app.store.get_all()[0].status.as_str(), "pending");
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let app = test_app();

    let response = app
        .server
        .post("/api/v1/confirmations/token/no-such-token/confirm")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn portal_confirm_requires_a_session() {
    let app = test_app();
    register_booking(&app).await;
    let booking_id = app.store.get_all()[0].id.0;

    // No Authorization header at all.
    let response = app
        .server
        .post(&format!("/api/v1/confirmations/{booking_id}/confirm"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Unknown session.
    let response = app
        .server
        .post(&format!("/api/v1/confirmations/{booking_id}/confirm"))
        .authorization_bearer("stale-session")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn portal_confirm_succeeds_for_the_owning_partner() {
    let app = test_app();
    register_booking(&app).await;
    let booking_id = app.store.get_all()[0].id.0;

    app.auth.grant("session-abc", "K12345");

    let response = app
        .server
        .post(&format!("/api/v1/confirmations/{booking_id}/confirm"))
        .authorization_bearer("session-abc")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["outcome"], "confirmed");
    assert_eq!(body["resolved_by"], "portal");
}

#[tokio::test]
async fn portal_decline_of_foreign_booking_is_unauthorized() {
    let app = test_app();
    register_booking(&app).await;
    let booking_id = app.store.get_all()[0].id.0;

    app.auth.grant("session-other", "K99999");

    let response = app
        .server
        .post(&format!("/api/v1/confirmations/{booking_id}/decline"))
        .authorization_bearer("session-other")
        .json(&json!({ "reason_code": "schedule_conflict" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.get_all()[0].status.as_str(), "pending");
}

#[tokio::test]
async fn decline_reasons_are_localized_and_sorted() {
    let app = test_app();

    let response = app.server.get("/api/v1/decline-reasons?locale=de").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let reasons = body.as_array().unwrap();
    assert!(!reasons.is_empty());
    assert_eq!(reasons[0]["code"], "schedule_conflict");
    assert_eq!(reasons[0]["label"], "Terminkonflikt");
    assert_eq!(reasons[0]["requires_notes"], false);

    let other = reasons
        .iter()
        .find(|r| r["code"] == "other")
        .expect("'other' reason present");
    assert_eq!(other["requires_notes"], true);
}

#[tokio::test]
async fn sweep_endpoint_reports_what_it_did() {
    let app = test_app();
    register_booking(&app).await;

    // Fresh bookings are not yet reminder-eligible.
    let response = app.server.post("/internal/sweep").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["scanned"], 0);
    assert_eq!(body["reminders_sent"], 0);
}

#[tokio::test]
async fn health_endpoints_answer() {
    let app = test_app();

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}
