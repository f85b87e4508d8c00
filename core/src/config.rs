//! Workflow configuration.
//!
//! The reminder cadence and escalation thresholds are operational
//! parameters, not invariants — they are configurable here and the
//! defaults reflect the portal's reference behavior.

use chrono::Duration;

/// Configuration for issuing confirmation tokens.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Validity window of a confirmation token.
    ///
    /// Default: 7 days
    pub token_ttl: Duration,
}

impl ConfirmationConfig {
    /// Create a configuration with the default validity window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_ttl: Duration::days(7),
        }
    }

    /// Set the token validity window.
    #[must_use]
    pub const fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reminder and escalation policy applied by the scheduler sweep.
#[derive(Debug, Clone)]
pub struct ReminderPolicy {
    /// How long a booking may sit pending before the first reminder.
    ///
    /// Default: 24 hours
    pub first_reminder_after: Duration,

    /// Minimum spacing between reminders for the same booking.
    ///
    /// Default: 24 hours
    pub reminder_interval: Duration,

    /// Maximum number of reminders before escalation takes over.
    ///
    /// Default: 2
    pub max_reminders: i32,

    /// Grace period after the last reminder before a still-pending booking
    /// is escalated into the support queue.
    ///
    /// Default: 48 hours
    pub escalation_grace: Duration,

    /// Upper bound on a single external call (reminder send, ticket
    /// creation) during a sweep. A slow collaborator must not stall the
    /// whole sweep.
    ///
    /// Default: 10 seconds
    pub dispatch_timeout: std::time::Duration,
}

impl ReminderPolicy {
    /// Create a policy with the reference defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            first_reminder_after: Duration::hours(24),
            reminder_interval: Duration::hours(24),
            max_reminders: 2,
            escalation_grace: Duration::hours(48),
            dispatch_timeout: std::time::Duration::from_secs(10),
        }
    }

    /// Set the delay before the first reminder.
    #[must_use]
    pub const fn with_first_reminder_after(mut self, d: Duration) -> Self {
        self.first_reminder_after = d;
        self
    }

    /// Set the minimum spacing between reminders.
    #[must_use]
    pub const fn with_reminder_interval(mut self, d: Duration) -> Self {
        self.reminder_interval = d;
        self
    }

    /// Set the maximum reminder count.
    #[must_use]
    pub const fn with_max_reminders(mut self, n: i32) -> Self {
        self.max_reminders = n;
        self
    }

    /// Set the escalation grace period.
    #[must_use]
    pub const fn with_escalation_grace(mut self, d: Duration) -> Self {
        self.escalation_grace = d;
        self
    }

    /// Set the per-call dispatch timeout.
    #[must_use]
    pub const fn with_dispatch_timeout(mut self, d: std::time::Duration) -> Self {
        self.dispatch_timeout = d;
        self
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_defaults() {
        let config = ConfirmationConfig::default();
        assert_eq!(config.token_ttl, Duration::days(7));
    }

    #[test]
    fn policy_builder() {
        let policy = ReminderPolicy::new()
            .with_first_reminder_after(Duration::hours(12))
            .with_reminder_interval(Duration::hours(6))
            .with_max_reminders(3)
            .with_escalation_grace(Duration::hours(24));

        assert_eq!(policy.first_reminder_after, Duration::hours(12));
        assert_eq!(policy.reminder_interval, Duration::hours(6));
        assert_eq!(policy.max_reminders, 3);
        assert_eq!(policy.escalation_grace, Duration::hours(24));
    }

    #[test]
    fn policy_defaults() {
        let policy = ReminderPolicy::default();
        assert_eq!(policy.first_reminder_after, Duration::hours(24));
        assert_eq!(policy.reminder_interval, Duration::hours(24));
        assert_eq!(policy.max_reminders, 2);
        assert_eq!(policy.escalation_grace, Duration::hours(48));
    }
}
