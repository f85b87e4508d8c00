//! Decline reason reference data for the decline UI.

use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for the reason listing.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleQuery {
    /// Requested label locale; falls back to English.
    pub locale: Option<String>,
}

/// One reason entry as shown in the decline UI.
#[derive(Debug, Clone, Serialize)]
pub struct DeclineReasonView {
    /// Stable reason code.
    pub code: String,
    /// Localized label.
    pub label: String,
    /// Whether the UI must collect notes for this reason.
    pub requires_notes: bool,
}

/// List active decline reasons in display order.
pub async fn list_decline_reasons<S, N, T, A>(
    State(state): State<Arc<AppState<S, N, T, A>>>,
    Query(query): Query<LocaleQuery>,
) -> Json<Vec<DeclineReasonView>>
where
    S: BookingStore + Clone + 'static,
    N: NotificationDispatcher + Clone + 'static,
    T: TicketingProvider + Clone + 'static,
    A: PortalAuth + Clone + 'static,
{
    let locale = query.locale.as_deref().unwrap_or("en");

    let reasons = state
        .engine
        .taxonomy()
        .active_reasons()
        .map(|reason| DeclineReasonView {
            code: reason.code.clone(),
            label: reason.label(locale).to_string(),
            requires_notes: reason.requires_notes,
        })
        .collect();

    Json(reasons)
}
