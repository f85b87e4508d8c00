//! Notification dispatcher trait.
//!
//! The workflow only decides *when* and *what* to request; rendering and
//! transport (templates, SMTP, delivery APIs) live behind this trait.

use crate::booking::BookingConfirmation;
use crate::error::Result;

/// Outbound notification delivery.
pub trait NotificationDispatcher: Send + Sync {
    /// Send the initial confirmation request for a freshly registered
    /// booking. The email carries the signed confirm/decline link built
    /// from the booking's token.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The delivery service rejects the request
    fn send_confirmation_request(
        &self,
        booking: &BookingConfirmation,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Send a reminder for a still-pending booking.
    ///
    /// # Arguments
    ///
    /// - `ordinal`: 1 for the first reminder, 2 for the second, ... —
    ///   content urgency escalates with the ordinal
    /// - `hours_waiting`: whole hours since the booking was created
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The delivery service rejects the request
    fn send_reminder(
        &self,
        booking: &BookingConfirmation,
        ordinal: i32,
        hours_waiting: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
