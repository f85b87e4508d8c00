//! Registration intake from the order source.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bookingflow_core::NewBooking;
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Response after registering a booking.
///
/// The confirmation token itself is never exposed here — it only travels
/// inside the email link.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredBookingResponse {
    /// Booking id.
    pub booking_id: uuid::Uuid,
    /// Always `pending` on registration.
    pub status: bookingflow_core::BookingStatus,
    /// When the emailed link stops working.
    pub token_expires_at: DateTime<Utc>,
}

/// Register a booking and request the initial confirmation email.
///
/// A failed send does not fail the registration: the booking is already
/// persisted and the reminder sweep will nudge the partner anyway.
///
/// # Errors
///
/// `500` if the booking cannot be persisted.
pub async fn register<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    Json(intake): Json<NewBooking>,
) -> Result<(StatusCode, Json<RegisteredBookingResponse>), AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let booking = state.engine.register(intake).await?;

    if let Err(e) = state.notifier.send_confirmation_request(&booking).await {
        warn!(
            booking_id = %booking.id,
            error = %e,
            "Initial confirmation request could not be sent"
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisteredBookingResponse {
            booking_id: booking.id.0,
            status: booking.status,
            token_expires_at: booking.token_expires_at,
        }),
    ))
}
