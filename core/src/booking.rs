//! Booking confirmation state types.
//!
//! One [`BookingConfirmation`] exists per purchased course-date line item.
//! The record is exclusively owned by the confirmation workflow; no other
//! component mutates its status fields directly.

use crate::error::{ConfirmationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a booking confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub uuid::Uuid);

impl BookingId {
    /// Generate a new random `BookingId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the partner account a booking belongs to
/// (the customer number in the partner portal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub String);

impl std::fmt::Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Closed enums
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a booking confirmation.
///
/// `Pending` is the initial state; `Confirmed` and `Declined` are terminal
/// with no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting the partner's answer.
    Pending,
    /// The partner accepted the booking.
    Confirmed,
    /// The partner rejected the booking.
    Declined,
}

impl BookingStatus {
    /// Convert status to its database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
        }
    }

    /// Parse status from its database string representation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::Database`] if the string doesn't match
    /// a known status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "declined" => Ok(Self::Declined),
            _ => Err(ConfirmationError::Database(format!(
                "Invalid booking status: {s}"
            ))),
        }
    }

    /// Returns `true` for the terminal states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Declined)
    }
}

/// The channel through which a transition was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Unauthenticated action via the signed email link.
    EmailToken,
    /// Authenticated action in the partner portal.
    Portal,
}

impl Actor {
    /// Convert actor to its database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmailToken => "email_token",
            Self::Portal => "portal",
        }
    }

    /// Parse actor from its database string representation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::Database`] if the string doesn't match
    /// a known actor.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "email_token" => Ok(Self::EmailToken),
            "portal" => Ok(Self::Portal),
            _ => Err(ConfirmationError::Database(format!("Invalid actor: {s}"))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Booking record
// ═══════════════════════════════════════════════════════════════════════

/// Intake data for a new booking, supplied by the order source when an
/// order containing a course date is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    /// External order id in the shop system.
    pub order_id: i64,
    /// External order-item id (one per course-date line item).
    pub order_item_id: i64,
    /// Human-readable order number, e.g. `"100023545"`.
    pub order_number: String,
    /// Customer number of the owning partner.
    pub customer_number: String,
    /// Contact address the confirmation request is sent to.
    pub customer_email: String,
    /// Course title, carried for notification rendering.
    pub course_title: String,
    /// Start of the booked course date.
    pub course_date: DateTime<Utc>,
}

/// The persisted confirmation state machine for one booked course date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Internal id.
    pub id: BookingId,
    /// External order id.
    pub order_id: i64,
    /// External order-item id.
    pub order_item_id: i64,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer number of the owning partner.
    pub customer_number: String,
    /// Contact address for confirmation and reminder emails.
    pub customer_email: String,
    /// Course title, carried for notification rendering.
    pub course_title: String,
    /// Start of the booked course date.
    pub course_date: DateTime<Utc>,

    /// Current lifecycle status. Monotonic: never leaves a terminal state.
    pub status: BookingStatus,

    /// Opaque unguessable token embedded in the email link. One token per
    /// booking for its entire lifetime; never reissued.
    pub confirmation_token: String,
    /// Token-based actions are rejected after this point. Portal actions
    /// are not subject to token expiry.
    pub token_expires_at: DateTime<Utc>,

    /// When the booking was confirmed. Set exactly once, on the winning
    /// pending→confirmed transition. Mutually exclusive with the declined
    /// fields.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Channel through which the booking was confirmed.
    pub confirmed_by: Option<Actor>,

    /// When the booking was declined. Set exactly once, on the winning
    /// pending→declined transition.
    pub declined_at: Option<DateTime<Utc>>,
    /// Channel through which the booking was declined.
    pub declined_by: Option<Actor>,
    /// Code of the decline reason.
    pub decline_reason: Option<String>,
    /// Free-text notes, required when the reason mandates them.
    pub decline_notes: Option<String>,

    /// Number of reminders sent so far. Incremented only while pending.
    pub reminder_count: i32,
    /// When the most recent reminder was sent; paces the reminder cadence.
    pub last_reminder_at: Option<DateTime<Utc>>,

    /// Set once, the first time the booking crosses the escalation
    /// threshold.
    pub escalated_at: Option<DateTime<Utc>>,
    /// External support ticket reference, set together with `escalated_at`.
    pub odoo_ticket_id: Option<i64>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BookingConfirmation {
    /// Build a fresh pending booking from intake data plus a minted token.
    #[must_use]
    pub fn new(
        intake: NewBooking,
        token: String,
        token_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::new(),
            order_id: intake.order_id,
            order_item_id: intake.order_item_id,
            order_number: intake.order_number,
            customer_number: intake.customer_number,
            customer_email: intake.customer_email,
            course_title: intake.course_title,
            course_date: intake.course_date,
            status: BookingStatus::Pending,
            confirmation_token: token,
            token_expires_at,
            confirmed_at: None,
            confirmed_by: None,
            declined_at: None,
            declined_by: None,
            decline_reason: None,
            decline_notes: None,
            reminder_count: 0,
            last_reminder_at: None,
            escalated_at: None,
            odoo_ticket_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` while the booking awaits an answer.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, BookingStatus::Pending)
    }

    /// Whole hours elapsed since the booking was created.
    #[must_use]
    pub fn hours_waiting(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_hours()
    }

    /// Returns `true` once the token validity window has passed.
    #[must_use]
    pub fn token_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.token_expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn intake() -> NewBooking {
        NewBooking {
            order_id: 4711,
            order_item_id: 9001,
            order_number: "100023545".to_string(),
            customer_number: "K12345".to_string(),
            customer_email: "partner@example.com".to_string(),
            course_title: "First Aid Basics".to_string(),
            course_date: Utc::now() + Duration::days(21),
        }
    }

    #[test]
    fn status_roundtrip() {
        for status in &[
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Declined,
        ] {
            let parsed = BookingStatus::parse(status.as_str());
            assert_eq!(parsed, Ok(*status));
        }
    }

    #[test]
    fn status_invalid() {
        assert!(BookingStatus::parse("cancelled").is_err());
    }

    #[test]
    fn actor_roundtrip() {
        for actor in &[Actor::EmailToken, Actor::Portal] {
            assert_eq!(Actor::parse(actor.as_str()), Ok(*actor));
        }
        assert!(Actor::parse("api").is_err());
    }

    #[test]
    fn new_booking_starts_pending() {
        let now = Utc::now();
        let booking = BookingConfirmation::new(
            intake(),
            "tok".to_string(),
            now + Duration::days(7),
            now,
        );

        assert!(booking.is_pending());
        assert_eq!(booking.reminder_count, 0);
        assert!(booking.confirmed_at.is_none());
        assert!(booking.declined_at.is_none());
        assert!(booking.escalated_at.is_none());
        assert!(!booking.token_expired(now));
        assert!(booking.token_expired(now + Duration::days(8)));
    }

    #[test]
    fn hours_waiting_counts_whole_hours() {
        let now = Utc::now();
        let booking =
            BookingConfirmation::new(intake(), "tok".to_string(), now + Duration::days(7), now);

        assert_eq!(booking.hours_waiting(now + Duration::hours(25)), 25);
        assert_eq!(
            booking.hours_waiting(now + Duration::minutes(90)),
            1
        );
    }
}
