//! Mock ticketing provider.

use crate::booking::{BookingConfirmation, BookingId};
use crate::error::{ConfirmationError, Result};
use crate::providers::TicketingProvider;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Mock ticketing provider.
///
/// Hands out sequential ticket ids and records what was created; can be
/// switched into a failing mode to exercise retry behavior.
#[derive(Debug, Clone)]
pub struct MockTicketing {
    next_id: Arc<AtomicI64>,
    created: Arc<Mutex<Vec<(BookingId, i64)>>>,
    failing: Arc<AtomicBool>,
}

impl MockTicketing {
    /// Create a new mock ticketing provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(9001)),
            created: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent ticket creation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Tickets created so far, as `(booking, ticket id)` pairs.
    #[must_use]
    pub fn created_tickets(&self) -> Vec<(BookingId, i64)> {
        self.created.lock().unwrap().clone()
    }
}

impl Default for MockTicketing {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketingProvider for MockTicketing {
    async fn create_escalation_ticket(&self, booking: &BookingConfirmation) -> Result<i64> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConfirmationError::DispatchFailed(
                "Mock ticketing is failing".to_string(),
            ));
        }

        let ticket_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push((booking.id, ticket_id));
        Ok(ticket_id)
    }
}
