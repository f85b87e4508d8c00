//! In-memory booking store.

use crate::booking::{BookingConfirmation, BookingId, BookingStatus};
use crate::error::{ConfirmationError, Result};
use crate::providers::{BookingStore, Resolution};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory booking store.
///
/// All atomic operations run under one mutex, which gives the same
/// at-most-one-winner semantics as the conditional SQL updates of the
/// production store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    bookings: Arc<Mutex<HashMap<BookingId, BookingConfirmation>>>,
}

impl MemoryBookingStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored bookings (for testing).
    #[must_use]
    pub fn get_all(&self) -> Vec<BookingConfirmation> {
        self.bookings.lock().unwrap().values().cloned().collect()
    }
}

impl BookingStore for MemoryBookingStore {
    async fn insert(&self, booking: &BookingConfirmation) -> Result<()> {
        let mut bookings = self.bookings.lock().unwrap();

        if bookings.contains_key(&booking.id) {
            return Err(ConfirmationError::Database(format!(
                "Duplicate booking id: {}",
                booking.id
            )));
        }
        if bookings
            .values()
            .any(|b| b.confirmation_token == booking.confirmation_token)
        {
            return Err(ConfirmationError::Database(
                "Duplicate confirmation token".to_string(),
            ));
        }

        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<BookingConfirmation>> {
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<BookingConfirmation>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .find(|b| b.confirmation_token == token)
            .cloned())
    }

    async fn list_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BookingConfirmation>> {
        let mut pending: Vec<BookingConfirmation> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.status == BookingStatus::Pending && b.created_at <= cutoff)
            .cloned()
            .collect();
        pending.sort_by_key(|b| b.created_at);
        Ok(pending)
    }

    async fn try_transition(&self, id: BookingId, resolution: Resolution) -> Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();

        // Atomic check-and-update under mutex protection
        let Some(booking) = bookings.get_mut(&id) else {
            return Ok(false);
        };
        if booking.status != BookingStatus::Pending {
            return Ok(false);
        }

        match resolution {
            Resolution::Confirmed { at, by } => {
                booking.status = BookingStatus::Confirmed;
                booking.confirmed_at = Some(at);
                booking.confirmed_by = Some(by);
                booking.updated_at = at;
            }
            Resolution::Declined {
                at,
                by,
                reason,
                notes,
            } => {
                booking.status = BookingStatus::Declined;
                booking.declined_at = Some(at);
                booking.declined_by = Some(by);
                booking.decline_reason = Some(reason);
                booking.decline_notes = notes;
                booking.updated_at = at;
            }
        }

        Ok(true)
    }

    async fn increment_reminder(&self, id: BookingId, sent_at: DateTime<Utc>) -> Result<()> {
        let mut bookings = self.bookings.lock().unwrap();

        if let Some(booking) = bookings.get_mut(&id) {
            if booking.status == BookingStatus::Pending {
                booking.reminder_count += 1;
                booking.last_reminder_at = Some(sent_at);
                booking.updated_at = sent_at;
            }
        }

        Ok(())
    }

    async fn mark_escalated(&self, id: BookingId, ticket_id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut bookings = self.bookings.lock().unwrap();

        if let Some(booking) = bookings.get_mut(&id) {
            if booking.escalated_at.is_none() {
                booking.escalated_at = Some(at);
                booking.odoo_ticket_id = Some(ticket_id);
                booking.updated_at = at;
            }
        }

        Ok(())
    }

    async fn count_pending(&self) -> Result<i64> {
        let count = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.status == BookingStatus::Pending)
            .count();
        Ok(count as i64)
    }
}
