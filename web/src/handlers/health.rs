//! Health check endpoints.
//!
//! Used by load balancers and monitoring to verify service health.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use serde::Serialize;
use std::sync::Arc;

/// Simple liveness check; does NOT touch dependencies.
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness response body.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// `"ready"` or `"unavailable"`.
    pub status: &'static str,
    /// Pending bookings, when the store is reachable.
    pub pending_bookings: Option<i64>,
}

/// Readiness check: probes the booking store.
///
/// - 200 OK when the store answers
/// - 503 Service Unavailable when it does not
pub async fn readiness<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
) -> (StatusCode, Json<ReadinessResponse>)
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    match state.store.count_pending().await {
        Ok(pending) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                pending_bookings: Some(pending),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    pending_bookings: None,
                }),
            )
        }
    }
}
