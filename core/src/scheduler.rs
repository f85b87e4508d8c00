//! Reminder and escalation scheduler.
//!
//! A periodic sweep over bookings still pending: send reminders with
//! escalating urgency, and hand long-unanswered bookings to the support
//! queue. Store mutation happens only after a successful dispatch, so a
//! failed send is simply retried on the next sweep — no partial state.
//!
//! Overlapping sweeps are safe: `mark_escalated` is idempotent and the
//! minimum-interval check gates repeat reminders.

use crate::booking::BookingConfirmation;
use crate::config::ReminderPolicy;
use crate::error::{ConfirmationError, Result};
use crate::providers::{BookingStore, NotificationDispatcher, TicketingProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Summary of one sweep, returned by the trigger endpoint and logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Pending bookings the sweep looked at.
    pub scanned: u64,
    /// Reminders successfully dispatched (and recorded).
    pub reminders_sent: u64,
    /// Bookings escalated into the support queue.
    pub escalations: u64,
    /// Per-booking dispatch failures; retried on the next sweep.
    pub failures: u64,
}

/// What the sweep decided for a single booking.
enum SweepAction {
    Reminded(i32),
    Escalated(i64),
    Skipped,
}

/// The reminder/escalation scheduler.
#[derive(Debug, Clone)]
pub struct ReminderScheduler<S, N, T> {
    store: S,
    notifier: N,
    ticketing: T,
    policy: ReminderPolicy,
}

impl<S, N, T> ReminderScheduler<S, N, T>
where
    S: BookingStore,
    N: NotificationDispatcher,
    T: TicketingProvider,
{
    /// Create a new scheduler.
    #[must_use]
    pub const fn new(store: S, notifier: N, ticketing: T, policy: ReminderPolicy) -> Self {
        Self {
            store,
            notifier,
            ticketing,
            policy,
        }
    }

    /// Run one sweep to completion.
    ///
    /// Per-booking failures are logged and counted, never propagated — a
    /// broken mailbox or an unreachable ticketing system must not block
    /// the other bookings in the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error only if the pending-booking listing itself fails.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let cutoff = now - self.policy.first_reminder_after;
        let pending = self.store.list_pending_older_than(cutoff).await?;

        let mut report = SweepReport {
            scanned: pending.len() as u64,
            ..SweepReport::default()
        };

        for booking in pending {
            match self.step(&booking, now).await {
                Ok(SweepAction::Reminded(ordinal)) => {
                    report.reminders_sent += 1;
                    info!(
                        booking_id = %booking.id,
                        ordinal = ordinal,
                        "Reminder sent"
                    );
                }
                Ok(SweepAction::Escalated(ticket_id)) => {
                    report.escalations += 1;
                    info!(
                        booking_id = %booking.id,
                        ticket_id = ticket_id,
                        "Booking escalated to support queue"
                    );
                }
                Ok(SweepAction::Skipped) => {}
                Err(e) => {
                    report.failures += 1;
                    warn!(
                        booking_id = %booking.id,
                        error = %e,
                        "Sweep step failed, will retry next sweep"
                    );
                }
            }
        }

        info!(
            scanned = report.scanned,
            reminders = report.reminders_sent,
            escalations = report.escalations,
            failures = report.failures,
            "Sweep finished"
        );

        Ok(report)
    }

    /// Decide and execute the action for one pending booking.
    async fn step(&self, booking: &BookingConfirmation, now: DateTime<Utc>) -> Result<SweepAction> {
        // Escalated bookings stay pending for confirm/decline purposes but
        // the scheduler is done with them.
        if booking.escalated_at.is_some() {
            return Ok(SweepAction::Skipped);
        }

        if booking.reminder_count < self.policy.max_reminders {
            let due = booking
                .last_reminder_at
                .is_none_or(|last| now - last >= self.policy.reminder_interval);
            if !due {
                debug!(booking_id = %booking.id, "Reminder not due yet");
                return Ok(SweepAction::Skipped);
            }

            let ordinal = booking.reminder_count + 1;
            self.dispatch(self.notifier.send_reminder(
                booking,
                ordinal,
                booking.hours_waiting(now),
            ))
            .await?;

            // Recorded only after the dispatch was confirmed.
            self.store.increment_reminder(booking.id, now).await?;
            return Ok(SweepAction::Reminded(ordinal));
        }

        // Reminders exhausted; escalate once the grace period has passed.
        let anchor = booking.last_reminder_at.unwrap_or(booking.created_at);
        if now - anchor < self.policy.escalation_grace {
            return Ok(SweepAction::Skipped);
        }

        let ticket_id = self
            .dispatch(self.ticketing.create_escalation_ticket(booking))
            .await?;
        self.store.mark_escalated(booking.id, ticket_id, now).await?;
        Ok(SweepAction::Escalated(ticket_id))
    }

    /// Bound an external call by the policy's dispatch timeout.
    async fn dispatch<F, V>(&self, call: F) -> Result<V>
    where
        F: std::future::Future<Output = Result<V>>,
    {
        tokio::time::timeout(self.policy.dispatch_timeout, call)
            .await
            .map_err(|_| {
                ConfirmationError::DispatchFailed("External call timed out".to_string())
            })?
    }
}
