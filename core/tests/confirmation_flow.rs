//! Integration tests for the confirmation transition engine.

#![allow(clippy::unwrap_used)] // Test code uses unwrap for clear failure messages

use bookingflow_core::mocks::MemoryBookingStore;
use bookingflow_core::providers::BookingStore;
use bookingflow_core::{
    Actor, BookingConfirmation, BookingStatus, ConfirmationConfig, ConfirmationEngine,
    ConfirmationError, DeclineTaxonomy, NewBooking, PartnerId, TransitionOutcome,
};
use chrono::{Duration, Utc};

fn intake(customer_number: &str) -> NewBooking {
    NewBooking {
        order_id: 4711,
        order_item_id: 9001,
        order_number: "100023545".to_string(),
        customer_number: customer_number.to_string(),
        customer_email: "partner@example.com".to_string(),
        course_title: "First Aid Basics".to_string(),
        course_date: Utc::now() + Duration::days(21),
    }
}

fn engine(store: MemoryBookingStore) -> ConfirmationEngine<MemoryBookingStore> {
    ConfirmationEngine::new(
        store,
        DeclineTaxonomy::standard(),
        ConfirmationConfig::default(),
    )
}

/// Insert a pending booking whose token expired an hour ago.
async fn seed_expired(store: &MemoryBookingStore, customer: &str) -> BookingConfirmation {
    let now = Utc::now();
    let booking = BookingConfirmation::new(
        intake(customer),
        bookingflow_core::token::mint_token(),
        now - Duration::hours(1),
        now - Duration::days(8),
    );
    store.insert(&booking).await.unwrap();
    booking
}

#[tokio::test]
async fn register_creates_pending_booking_with_token_window() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());

    let before = Utc::now();
    let booking = engine.register(intake("K100")).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.confirmation_token.len(), 43);
    let ttl = booking.token_expires_at - booking.created_at;
    assert_eq!(ttl, Duration::days(7));
    assert!(booking.created_at >= before);

    let stored = store.get(booking.id).await.unwrap().unwrap();
    assert_eq!(stored, booking);
}

#[tokio::test]
async fn confirm_by_token_applies_transition() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = engine.register(intake("K100")).await.unwrap();

    let outcome = engine
        .confirm_by_token(&booking.confirmation_token)
        .await
        .unwrap();

    let TransitionOutcome::Applied(confirmed) = outcome else {
        panic!("Expected Applied, got {outcome:?}");
    };
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.confirmed_by, Some(Actor::EmailToken));
    assert!(confirmed.confirmed_at.is_some());
    assert!(confirmed.declined_at.is_none());
}

#[tokio::test]
async fn terminal_state_is_immutable() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = engine.register(intake("K100")).await.unwrap();

    engine
        .confirm_by_token(&booking.confirmation_token)
        .await
        .unwrap();
    let snapshot = store.get(booking.id).await.unwrap().unwrap();

    // A later decline must not change anything.
    let outcome = engine
        .decline_from_portal(
            booking.id,
            &PartnerId("K100".to_string()),
            "schedule_conflict",
            None,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::AlreadyConfirmed(_)));

    // Neither must a second confirm.
    let outcome = engine
        .confirm_from_portal(booking.id, &PartnerId("K100".to_string()))
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::AlreadyConfirmed(_)));

    let after = store.get(booking.id).await.unwrap().unwrap();
    assert_eq!(after, snapshot);
}

#[tokio::test]
async fn simultaneous_confirm_and_decline_have_one_winner() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = engine.register(intake("K100")).await.unwrap();
    let partner = PartnerId("K100".to_string());

    let (confirm, decline) = tokio::join!(
        engine.confirm_by_token(&booking.confirmation_token),
        engine.decline_from_portal(booking.id, &partner, "schedule_conflict", None),
    );
    let confirm = confirm.unwrap();
    let decline = decline.unwrap();

    let applied = [confirm.applied(), decline.applied()]
        .iter()
        .filter(|won| **won)
        .count();
    assert_eq!(applied, 1, "Exactly one of the two racing calls may win");

    // The loser observes the winner's actual resulting state.
    let resolved = store.get(booking.id).await.unwrap().unwrap();
    match resolved.status {
        BookingStatus::Confirmed => {
            assert!(confirm.applied());
            assert!(matches!(decline, TransitionOutcome::AlreadyConfirmed(_)));
            assert!(resolved.decline_reason.is_none());
        }
        BookingStatus::Declined => {
            assert!(decline.applied());
            assert!(matches!(confirm, TransitionOutcome::AlreadyDeclined(_)));
            assert!(resolved.confirmed_at.is_none());
        }
        BookingStatus::Pending => panic!("Booking must be resolved after the race"),
    }
}

#[tokio::test]
async fn decline_without_required_notes_fails_before_any_write() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = engine.register(intake("K100")).await.unwrap();

    for notes in [None, Some(""), Some("   \t ")] {
        let err = engine
            .decline_by_token(&booking.confirmation_token, "other", notes)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConfirmationError::NotesRequired {
                code: "other".to_string()
            }
        );
    }

    let stored = store.get(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    assert!(stored.declined_at.is_none());
    assert!(stored.decline_reason.is_none());
}

#[tokio::test]
async fn decline_with_unknown_reason_is_rejected() {
    let store = MemoryBookingStore::new();
    let engine = engine(store);
    let booking = engine.register(intake("K100")).await.unwrap();

    let err = engine
        .decline_by_token(&booking.confirmation_token, "does_not_exist", None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ConfirmationError::InvalidReason {
            code: "does_not_exist".to_string()
        }
    );
}

#[tokio::test]
async fn decline_without_notes_succeeds_when_reason_allows_it() {
    let store = MemoryBookingStore::new();
    let engine = engine(store);
    let booking = engine.register(intake("K100")).await.unwrap();

    let outcome = engine
        .decline_by_token(&booking.confirmation_token, "schedule_conflict", None)
        .await
        .unwrap();

    let TransitionOutcome::Applied(declined) = outcome else {
        panic!("Expected Applied, got {outcome:?}");
    };
    assert_eq!(declined.status, BookingStatus::Declined);
    assert_eq!(declined.declined_by, Some(Actor::EmailToken));
    assert_eq!(declined.decline_reason.as_deref(), Some("schedule_conflict"));
    assert_eq!(declined.decline_notes, None);
}

#[tokio::test]
async fn decline_notes_are_trimmed() {
    let store = MemoryBookingStore::new();
    let engine = engine(store);
    let booking = engine.register(intake("K100")).await.unwrap();

    let outcome = engine
        .decline_by_token(
            &booking.confirmation_token,
            "other",
            Some("  date collides with our audit week  "),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.booking().decline_notes.as_deref(),
        Some("date collides with our audit week")
    );
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let store = MemoryBookingStore::new();
    let engine = engine(store);

    assert_eq!(
        engine.confirm_by_token("no-such-token").await.unwrap_err(),
        ConfirmationError::NotFound
    );
    assert_eq!(
        engine.status_by_token("no-such-token").await.unwrap_err(),
        ConfirmationError::NotFound
    );
}

#[tokio::test]
async fn expired_token_rejects_link_but_not_portal() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = seed_expired(&store, "K100").await;

    assert_eq!(
        engine
            .confirm_by_token(&booking.confirmation_token)
            .await
            .unwrap_err(),
        ConfirmationError::TokenExpired
    );
    assert_eq!(
        engine
            .decline_by_token(&booking.confirmation_token, "schedule_conflict", None)
            .await
            .unwrap_err(),
        ConfirmationError::TokenExpired
    );

    // The same action as the authenticated owning partner still succeeds.
    let outcome = engine
        .confirm_from_portal(booking.id, &PartnerId("K100".to_string()))
        .await
        .unwrap();
    assert!(outcome.applied());
    assert_eq!(outcome.booking().confirmed_by, Some(Actor::Portal));
}

#[tokio::test]
async fn expired_link_on_resolved_booking_shows_final_state() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = seed_expired(&store, "K100").await;

    engine
        .confirm_from_portal(booking.id, &PartnerId("K100".to_string()))
        .await
        .unwrap();

    // The stale link is answered with the resolved state, not an error.
    let outcome = engine
        .confirm_by_token(&booking.confirmation_token)
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::AlreadyConfirmed(_)));

    let view = engine
        .status_by_token(&booking.confirmation_token)
        .await
        .unwrap();
    assert!(view.token_expired);
    assert_eq!(view.booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn portal_actor_must_own_the_booking() {
    let store = MemoryBookingStore::new();
    let engine = engine(store.clone());
    let booking = engine.register(intake("K100")).await.unwrap();

    let err = engine
        .confirm_from_portal(booking.id, &PartnerId("K999".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err, ConfirmationError::Unauthorized);

    let stored = store.get(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
}

#[tokio::test]
async fn status_by_token_reports_live_pending_link() {
    let store = MemoryBookingStore::new();
    let engine = engine(store);
    let booking = engine.register(intake("K100")).await.unwrap();

    let view = engine
        .status_by_token(&booking.confirmation_token)
        .await
        .unwrap();
    assert!(!view.token_expired);
    assert_eq!(view.booking.status, BookingStatus::Pending);
}
