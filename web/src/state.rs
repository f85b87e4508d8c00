//! Application state for Axum handlers.

use bookingflow_core::providers::{
    BookingStore, NotificationDispatcher, PortalAuth, TicketingProvider,
};
use bookingflow_core::{ConfirmationEngine, ReminderScheduler};

/// State shared across all HTTP handlers, wrapped in an `Arc` by the
/// router.
///
/// Generic over the concrete providers so tests run against the in-memory
/// mocks and production runs against PostgreSQL/SMTP/Odoo without any
/// code changes in the handlers.
pub struct AppState<S, N, T, A> {
    /// The transition engine.
    pub engine: ConfirmationEngine<S>,
    /// The reminder/escalation scheduler.
    pub scheduler: ReminderScheduler<S, N, T>,
    /// Direct store handle, used by the readiness probe.
    pub store: S,
    /// Dispatcher for the initial confirmation request.
    pub notifier: N,
    /// Portal session verifier.
    pub auth: A,
}

impl<S, N, T, A> AppState<S, N, T, A>
where
    S: BookingStore + Clone,
    N: NotificationDispatcher + Clone,
    T: TicketingProvider + Clone,
    A: PortalAuth + Clone,
{
    /// Create the application state.
    #[must_use]
    pub const fn new(
        engine: ConfirmationEngine<S>,
        scheduler: ReminderScheduler<S, N, T>,
        store: S,
        notifier: N,
        auth: A,
    ) -> Self {
        Self {
            engine,
            scheduler,
            store,
            notifier,
            auth,
        }
    }
}
