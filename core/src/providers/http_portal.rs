//! Portal session verification over HTTP.
//!
//! The partner portal owns authentication. This client introspects a
//! bearer session against the portal's session endpoint and resolves the
//! acting partner's customer number.

use crate::booking::PartnerId;
use crate::error::{ConfirmationError, Result};
use crate::providers::PortalAuth;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SessionInfo {
    customer_number: String,
}

/// HTTP session introspection client.
#[derive(Clone)]
pub struct HttpPortalAuth {
    client: reqwest::Client,
    session_url: String,
}

impl HttpPortalAuth {
    /// Create a new introspection client.
    ///
    /// # Arguments
    ///
    /// - `base_url`: portal auth service root; the session endpoint is
    ///   `{base_url}/api/v1/session`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            session_url: format!("{}/api/v1/session", base_url.trim_end_matches('/')),
        }
    }
}

impl PortalAuth for HttpPortalAuth {
    async fn authenticate_portal_actor(&self, bearer: &str) -> Result<PartnerId> {
        let response = self
            .client
            .get(&self.session_url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| {
                ConfirmationError::DispatchFailed(format!("Session verification failed: {e}"))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ConfirmationError::Unauthorized);
        }

        let session: SessionInfo = response
            .error_for_status()
            .map_err(|e| {
                ConfirmationError::DispatchFailed(format!("Session verification failed: {e}"))
            })?
            .json()
            .await
            .map_err(|e| {
                ConfirmationError::DispatchFailed(format!("Session response invalid: {e}"))
            })?;

        Ok(PartnerId(session.customer_number))
    }
}
