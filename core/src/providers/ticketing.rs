//! Ticketing collaborator trait.

use crate::booking::BookingConfirmation;
use crate::error::Result;

/// External support-queue integration.
///
/// Escalation hands a long-unanswered booking to a human support queue by
/// creating a ticket that summarizes the booking. The workflow records the
/// returned ticket id; ticket lifecycle beyond creation is out of scope.
pub trait TicketingProvider: Send + Sync {
    /// Create an escalation ticket for an unanswered booking.
    ///
    /// Returns the external ticket id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The ticketing system rejects the request
    fn create_escalation_ticket(
        &self,
        booking: &BookingConfirmation,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;
}
