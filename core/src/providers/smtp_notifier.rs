//! SMTP notification dispatcher using Lettre.

use crate::booking::BookingConfirmation;
use crate::error::{ConfirmationError, Result};
use crate::providers::NotificationDispatcher;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP notification dispatcher.
///
/// Sends real emails via SMTP, suitable for production use. Template
/// rendering is intentionally minimal here — the portal's full HTML
/// templates live with the delivery service, this dispatcher produces the
/// plain-text variant.
#[derive(Clone)]
pub struct SmtpNotifier {
    smtp_server: String,
    smtp_port: u16,
    credentials: Credentials,
    from_header: String,
    base_url: String,
}

impl SmtpNotifier {
    /// Create a new SMTP dispatcher.
    ///
    /// # Arguments
    ///
    /// - `smtp_server` / `smtp_port`: relay address
    /// - `smtp_username` / `smtp_password`: relay credentials
    /// - `from_email` / `from_name`: sender identity
    /// - `base_url`: base URL the confirmation links are built against
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
        base_url: String,
    ) -> Self {
        let credentials = Credentials::new(smtp_username, smtp_password);
        let from_header = format!("{from_name} <{from_email}>");

        Self {
            smtp_server,
            smtp_port,
            credentials,
            from_header,
            base_url,
        }
    }

    /// Build an SMTP transport.
    ///
    /// A fresh transport per email avoids long-lived connection state on a
    /// low-volume sender.
    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp_server)
            .map_err(|e| ConfirmationError::DispatchFailed(format!("SMTP relay error: {e}")))?;

        Ok(builder
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn confirmation_link(&self, booking: &BookingConfirmation) -> String {
        format!(
            "{}/confirmations/token/{}",
            self.base_url, booking.confirmation_token
        )
    }

    async fn send_text(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from_header
                    .parse()
                    .map_err(|e| ConfirmationError::DispatchFailed(format!("Bad sender: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| ConfirmationError::DispatchFailed(format!("Bad recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ConfirmationError::DispatchFailed(format!("Message build error: {e}")))?;

        self.build_transport()?
            .send(message)
            .await
            .map_err(|e| ConfirmationError::DispatchFailed(format!("SMTP send error: {e}")))?;

        Ok(())
    }
}

impl NotificationDispatcher for SmtpNotifier {
    async fn send_confirmation_request(&self, booking: &BookingConfirmation) -> Result<()> {
        let link = self.confirmation_link(booking);
        let subject = format!("Please confirm booking {}", booking.order_number);
        let body = format!(
            "A customer has booked \"{}\" on {}.\n\n\
             Please confirm or decline this booking within 7 days:\n\n{link}\n\n\
             You can also respond in the partner portal.\n",
            booking.course_title,
            booking.course_date.format("%Y-%m-%d"),
        );

        self.send_text(&booking.customer_email, &subject, body).await
    }

    async fn send_reminder(
        &self,
        booking: &BookingConfirmation,
        ordinal: i32,
        hours_waiting: i64,
    ) -> Result<()> {
        let link = self.confirmation_link(booking);
        let subject = if ordinal >= 2 {
            format!("Urgent: booking {} still unconfirmed", booking.order_number)
        } else {
            format!("Reminder: please confirm booking {}", booking.order_number)
        };
        let body = format!(
            "The booking of \"{}\" on {} has been waiting for your answer \
             for {hours_waiting} hours.\n\n\
             Please confirm or decline now:\n\n{link}\n",
            booking.course_title,
            booking.course_date.format("%Y-%m-%d"),
        );

        self.send_text(&booking.customer_email, &subject, body).await
    }
}
