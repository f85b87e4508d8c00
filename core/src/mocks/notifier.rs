//! Mock notification dispatcher.

use crate::booking::{BookingConfirmation, BookingId};
use crate::error::{ConfirmationError, Result};
use crate::providers::NotificationDispatcher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A reminder recorded by the mock dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReminder {
    /// Booking the reminder was sent for.
    pub booking_id: BookingId,
    /// 1 for the first reminder, 2 for the second, ...
    pub ordinal: i32,
    /// Hours the booking had been waiting when the reminder was sent.
    pub hours_waiting: i64,
}

/// Mock notification dispatcher.
///
/// Records every send; can be switched into a failing mode to exercise
/// retry behavior.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    requests: Arc<Mutex<Vec<BookingId>>>,
    reminders: Arc<Mutex<Vec<RecordedReminder>>>,
    failing: Arc<AtomicBool>,
}

impl MockNotifier {
    /// Create a new mock dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Confirmation requests sent so far.
    #[must_use]
    pub fn sent_requests(&self) -> Vec<BookingId> {
        self.requests.lock().unwrap().clone()
    }

    /// Reminders sent so far.
    #[must_use]
    pub fn sent_reminders(&self) -> Vec<RecordedReminder> {
        self.reminders.lock().unwrap().clone()
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConfirmationError::DispatchFailed(
                "Mock dispatcher is failing".to_string(),
            ));
        }
        Ok(())
    }
}

impl NotificationDispatcher for MockNotifier {
    async fn send_confirmation_request(&self, booking: &BookingConfirmation) -> Result<()> {
        self.check_failing()?;
        self.requests.lock().unwrap().push(booking.id);
        Ok(())
    }

    async fn send_reminder(
        &self,
        booking: &BookingConfirmation,
        ordinal: i32,
        hours_waiting: i64,
    ) -> Result<()> {
        self.check_failing()?;
        self.reminders.lock().unwrap().push(RecordedReminder {
            booking_id: booking.id,
            ordinal,
            hours_waiting,
        });
        Ok(())
    }
}
