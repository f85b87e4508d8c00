//! Scheduler trigger endpoint.
//!
//! External cron (or the server's own interval timer) calls this to run
//! one reminder/escalation sweep to completion.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use bookingflow_core::SweepReport;
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use chrono::Utc;
use std::sync::Arc;

/// Run one sweep and report what happened.
///
/// # Errors
///
/// `500` if the pending-booking listing fails; per-booking dispatch
/// failures are counted in the report instead.
pub async fn run_sweep<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
) -> Result<Json<SweepReport>, AppError>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let report = state.scheduler.run_sweep(Utc::now()).await?;
    Ok(Json(report))
}
