//! Odoo helpdesk ticketing client.
//!
//! Escalation tickets are created through Odoo's external JSON-RPC API
//! (`/jsonrpc`, service `object`, `execute_kw`). Only ticket creation is
//! implemented; ticket lifecycle stays in Odoo.

use crate::booking::BookingConfirmation;
use crate::error::{ConfirmationError, Result};
use crate::providers::TicketingProvider;
use serde_json::json;

/// Odoo JSON-RPC ticketing client.
#[derive(Clone)]
pub struct OdooTicketing {
    client: reqwest::Client,
    endpoint: String,
    database: String,
    uid: i64,
    api_key: String,
    team_id: i64,
}

impl OdooTicketing {
    /// Create a new Odoo client.
    ///
    /// # Arguments
    ///
    /// - `base_url`: Odoo instance root (e.g. `https://erp.example.com`)
    /// - `database`: Odoo database name
    /// - `uid`: numeric id of the integration user
    /// - `api_key`: API key (or password) of the integration user
    /// - `team_id`: helpdesk team the escalation tickets land in
    #[must_use]
    pub fn new(base_url: &str, database: String, uid: i64, api_key: String, team_id: i64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/jsonrpc", base_url.trim_end_matches('/')),
            database,
            uid,
            api_key,
            team_id,
        }
    }

    fn ticket_fields(&self, booking: &BookingConfirmation) -> serde_json::Value {
        json!({
            "name": format!(
                "Unconfirmed booking {} ({})",
                booking.order_number, booking.course_title
            ),
            "description": format!(
                "Partner {} has not answered the confirmation request for \
                 order {} / item {} (course \"{}\" on {}). \
                 {} reminder(s) were sent. Please follow up by phone.",
                booking.customer_number,
                booking.order_number,
                booking.order_item_id,
                booking.course_title,
                booking.course_date.format("%Y-%m-%d"),
                booking.reminder_count,
            ),
            "team_id": self.team_id,
            "partner_email": booking.customer_email,
        })
    }
}

impl TicketingProvider for OdooTicketing {
    async fn create_escalation_ticket(&self, booking: &BookingConfirmation) -> Result<i64> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": "object",
                "method": "execute_kw",
                "args": [
                    self.database,
                    self.uid,
                    self.api_key,
                    "helpdesk.ticket",
                    "create",
                    [self.ticket_fields(booking)],
                ],
            },
            "id": 1,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConfirmationError::DispatchFailed(format!("Odoo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| ConfirmationError::DispatchFailed(format!("Odoo returned error: {e}")))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ConfirmationError::DispatchFailed(format!("Odoo response invalid: {e}")))?;

        if let Some(error) = body.get("error") {
            return Err(ConfirmationError::DispatchFailed(format!(
                "Odoo RPC error: {error}"
            )));
        }

        body.get("result")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                ConfirmationError::DispatchFailed("Odoo RPC returned no ticket id".to_string())
            })
    }
}
