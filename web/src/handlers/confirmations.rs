//! Confirm/decline handlers for both actor paths.
//!
//! The token routes are public (the link itself is the credential); the
//! portal routes require a bearer session resolved through the portal
//! auth provider before the engine is consulted.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use bookingflow_core::{Actor, BookingId, BookingStatus, TransitionOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body for a decline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeclineRequest {
    /// Code of the decline reason.
    pub reason_code: String,
    /// Free-text notes; required when the reason mandates them.
    pub notes: Option<String>,
}

/// Response after a confirm/decline attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationResponse {
    /// Booking id.
    pub booking_id: uuid::Uuid,
    /// Human-readable order number.
    pub order_number: String,
    /// Resulting status.
    pub status: BookingStatus,
    /// `"confirmed"` / `"declined"` when this call performed the
    /// transition, `"already_processed"` when another actor got there
    /// first.
    pub outcome: &'static str,
    /// When the booking was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Channel that resolved the booking.
    pub resolved_by: Option<Actor>,
}

impl ConfirmationResponse {
    fn from_outcome(outcome: TransitionOutcome) -> Self {
        let label = match (&outcome, outcome.booking().status) {
            (TransitionOutcome::Applied(_), BookingStatus::Confirmed) => "confirmed",
            (TransitionOutcome::Applied(_), BookingStatus::Declined) => "declined",
            _ => "already_processed",
        };
        let booking = outcome.booking();

        Self {
            booking_id: booking.id.0,
            order_number: booking.order_number.clone(),
            status: booking.status,
            outcome: label,
            resolved_at: booking.confirmed_at.or(booking.declined_at),
            resolved_by: booking.confirmed_by.or(booking.declined_by),
        }
    }
}

/// Landing-page view behind the email link.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatusResponse {
    /// Booking id.
    pub booking_id: uuid::Uuid,
    /// Human-readable order number.
    pub order_number: String,
    /// Course title.
    pub course_title: String,
    /// Start of the booked course date.
    pub course_date: DateTime<Utc>,
    /// Current status.
    pub status: BookingStatus,
    /// Whether the link has expired. A resolved booking is shown either
    /// way; a pending booking with an expired link can only be answered
    /// in the portal.
    pub token_expired: bool,
    /// Decline reason code, when declined.
    pub decline_reason: Option<String>,
}

/// Render the email-link landing page data.
///
/// # Errors
///
/// `404` for an unknown token.
pub async fn token_status<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    Path(token): Path<String>,
) -> Result<Json<TokenStatusResponse>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let view = state.engine.status_by_token(&token).await?;

    Ok(Json(TokenStatusResponse {
        booking_id: view.booking.id.0,
        order_number: view.booking.order_number,
        course_title: view.booking.course_title,
        course_date: view.booking.course_date,
        status: view.booking.status,
        token_expired: view.token_expired,
        decline_reason: view.booking.decline_reason,
    }))
}

/// Confirm a booking via its email-link token.
///
/// # Errors
///
/// `404` for an unknown token, `410` for an expired link on a pending
/// booking.
pub async fn confirm_by_token<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    Path(token): Path<String>,
) -> Result<Json<ConfirmationResponse>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let outcome = state.engine.confirm_by_token(&token).await?;
    Ok(Json(ConfirmationResponse::from_outcome(outcome)))
}

/// Decline a booking via its email-link token.
///
/// # Errors
///
/// Same as [`confirm_by_token`], plus `422` for an unknown reason or
/// missing mandatory notes.
pub async fn decline_by_token<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    Path(token): Path<String>,
    Json(request): Json<DeclineRequest>,
) -> Result<Json<ConfirmationResponse>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let outcome = state
        .engine
        .decline_by_token(&token, &request.reason_code, request.notes.as_deref())
        .await?;
    Ok(Json(ConfirmationResponse::from_outcome(outcome)))
}

/// Confirm a booking as the authenticated owning partner.
///
/// # Errors
///
/// `401` for a missing/invalid session or foreign booking, `404` for an
/// unknown booking id.
pub async fn confirm_portal<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    bearer: BearerToken,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<ConfirmationResponse>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let partner = state.auth.authenticate_portal_actor(&bearer.0).await?;
    let outcome = state
        .engine
        .confirm_from_portal(BookingId(id), &partner)
        .await?;
    Ok(Json(ConfirmationResponse::from_outcome(outcome)))
}

/// Decline a booking as the authenticated owning partner.
///
/// # Errors
///
/// Same as [`confirm_portal`], plus `422` for an unknown reason or
/// missing mandatory notes.
pub async fn decline_portal<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    bearer: BearerToken,
    Path(id): Path<uuid::Uuid>,
    Json(request): Json<DeclineRequest>,
) -> Result<Json<ConfirmationResponse>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let partner = state.auth.authenticate_portal_actor(&bearer.0).await?;
    let outcome = state
        .engine
        .decline_from_portal(
            BookingId(id),
            &partner,
            &request.reason_code,
            request.notes.as_deref(),
        )
        .await?;
    Ok(Json(ConfirmationResponse::from_outcome(outcome)))
}
