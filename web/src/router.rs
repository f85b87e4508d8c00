//! Router composition.
//!
//! Composes all confirmation workflow handlers into a single Axum router.

use crate::handlers::{bookings, confirmations, health, reasons, sweep};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the confirmation workflow router.
///
/// # Routes
///
/// ## Email-link path (public, the token is the credential)
/// - `GET  /api/v1/confirmations/token/:token` - landing page view
/// - `POST /api/v1/confirmations/token/:token/confirm`
/// - `POST /api/v1/confirmations/token/:token/decline`
///
/// ## Portal path (bearer session)
/// - `POST /api/v1/confirmations/:id/confirm`
/// - `POST /api/v1/confirmations/:id/decline`
///
/// ## Reference data and intake
/// - `GET  /api/v1/decline-reasons` - active reasons, localized
/// - `POST /api/v1/bookings` - registration intake from the order source
///
/// ## Operations
/// - `POST /internal/sweep` - run one reminder/escalation sweep
/// - `GET  /health`, `GET /health/ready`
pub fn confirmation_router<S, N, T, A>(state: Arc<AppState<S, N, T, A>>) -> Router
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    Router::new()
        // Email-link routes
        .route(
            "/api/v1/confirmations/token/:token",
            get(confirmations::token_status::<S, N, T, A>),
        )
        .route(
            "/api/v1/confirmations/token/:token/confirm",
            post(confirmations::confirm_by_token::<S, N, T, A>),
        )
        .route(
            "/api/v1/confirmations/token/:token/decline",
            post(confirmations::decline_by_token::<S, N, T, A>),
        )
        // Portal routes
        .route(
            "/api/v1/confirmations/:id/confirm",
            post(confirmations::confirm_portal::<S, N, T, A>),
        )
        .route(
            "/api/v1/confirmations/:id/decline",
            post(confirmations::decline_portal::<S, N, T, A>),
        )
        // Reference data and intake
        .route(
            "/api/v1/decline-reasons",
            get(reasons::list_decline_reasons::<S, N, T, A>),
        )
        .route("/api/v1/bookings", post(bookings::register::<S, N, T, A>))
        // Operations
        .route("/internal/sweep", post(sweep::run_sweep::<S, N, T, A>))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness::<S, N, T, A>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
