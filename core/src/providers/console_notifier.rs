//! Console notification dispatcher for development and testing.

use crate::booking::BookingConfirmation;
use crate::error::Result;
use crate::providers::NotificationDispatcher;
use tracing::info;

/// Console notification dispatcher.
///
/// Logs notifications to the console instead of sending them. Useful for
/// development where you don't want to send real emails.
#[derive(Clone, Debug)]
pub struct ConsoleNotifier {
    /// Base URL the confirmation links are built against.
    base_url: String,
}

impl ConsoleNotifier {
    /// Create a new console dispatcher.
    #[must_use]
    pub const fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn confirmation_link(&self, booking: &BookingConfirmation) -> String {
        format!(
            "{}/confirmations/token/{}",
            self.base_url, booking.confirmation_token
        )
    }
}

impl NotificationDispatcher for ConsoleNotifier {
    async fn send_confirmation_request(&self, booking: &BookingConfirmation) -> Result<()> {
        let link = self.confirmation_link(booking);

        info!(
            to = %booking.customer_email,
            order = %booking.order_number,
            course = %booking.course_title,
            "📧 Confirmation Request (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║               BOOKING CONFIRMATION REQUEST                   ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {:<57}║", booking.customer_email);
        println!("║ Order: {:<54}║", booking.order_number);
        println!("║ Course: {:<53}║", booking.course_title);
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ Please confirm or decline this booking:                      ║");
        println!("║ {link:<61}║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }

    async fn send_reminder(
        &self,
        booking: &BookingConfirmation,
        ordinal: i32,
        hours_waiting: i64,
    ) -> Result<()> {
        let link = self.confirmation_link(booking);

        info!(
            to = %booking.customer_email,
            order = %booking.order_number,
            ordinal = ordinal,
            hours_waiting = hours_waiting,
            "📧 Booking Reminder (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║               BOOKING REMINDER #{ordinal:<29}║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {:<57}║", booking.customer_email);
        println!("║ Order: {:<54}║", booking.order_number);
        println!("║ Waiting for {hours_waiting} hours.{:<38}║", "");
        println!("║ {link:<61}║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
