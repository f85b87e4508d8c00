//! Booking store trait.
//!
//! The store is the only shared mutable resource in the workflow. All
//! mutation goes through its atomic operations — a conditional status
//! write, an atomic reminder increment, and an idempotent escalation
//! mark — so no in-process locking is needed on top of it.

use crate::booking::{Actor, BookingConfirmation, BookingId};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Terminal resolution applied by [`BookingStore::try_transition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// pending → confirmed.
    Confirmed {
        /// Transition timestamp, becomes `confirmed_at`.
        at: DateTime<Utc>,
        /// Channel that performed the transition.
        by: Actor,
    },
    /// pending → declined.
    Declined {
        /// Transition timestamp, becomes `declined_at`.
        at: DateTime<Utc>,
        /// Channel that performed the transition.
        by: Actor,
        /// Validated decline reason code.
        reason: String,
        /// Trimmed notes, when given.
        notes: Option<String>,
    },
}

/// Persistence for [`BookingConfirmation`] records.
///
/// # Implementation Notes
///
/// - **CRITICAL**: `try_transition` MUST be a single atomic conditional
///   write ("set terminal fields WHERE status is still pending"). It is
///   the one enforcement point of the at-most-one-winner invariant under
///   concurrent confirm/decline attempts.
/// - `increment_reminder` must only touch pending rows; a transition
///   racing a reminder increment must not resurrect reminder activity on
///   a terminal booking.
/// - `mark_escalated` must be idempotent: once `escalated_at` is set, the
///   call is a no-op.
pub trait BookingStore: Send + Sync {
    /// Persist a freshly registered booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written (duplicate id or
    /// token, connection failure).
    fn insert(
        &self,
        booking: &BookingConfirmation,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fetch a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get(
        &self,
        id: BookingId,
    ) -> impl std::future::Future<Output = Result<Option<BookingConfirmation>>> + Send;

    /// Look up the booking owning this exact token.
    ///
    /// Does not itself check expiry or status — that is the engine's job,
    /// so a landing page can still be informative for an expired link.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_by_token(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Option<BookingConfirmation>>> + Send;

    /// All pending bookings created at or before `cutoff`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<BookingConfirmation>>> + Send;

    /// Atomically resolve a pending booking.
    ///
    /// Returns whether *this call* won — `false` means another actor
    /// already resolved the booking (or it vanished).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn try_transition(
        &self,
        id: BookingId,
        resolution: Resolution,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Atomically bump `reminder_count` and stamp `last_reminder_at`.
    ///
    /// Only applies while the booking is still pending; otherwise a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn increment_reminder(
        &self,
        id: BookingId,
        sent_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Record the escalation ticket, exactly once.
    ///
    /// A no-op when `escalated_at` is already set.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn mark_escalated(
        &self,
        id: BookingId,
        ticket_id: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Number of bookings currently pending.
    ///
    /// Used by readiness probes and sweep logging.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_pending(&self) -> impl std::future::Future<Output = Result<i64>> + Send;
}
