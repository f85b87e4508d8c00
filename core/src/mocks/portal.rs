//! Mock portal session verifier.

use crate::booking::PartnerId;
use crate::error::{ConfirmationError, Result};
use crate::providers::PortalAuth;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock portal session verifier.
///
/// Sessions are granted explicitly in tests; everything else is
/// unauthorized.
#[derive(Debug, Clone, Default)]
pub struct MockPortalAuth {
    sessions: Arc<Mutex<HashMap<String, String>>>,
}

impl MockPortalAuth {
    /// Create a new mock verifier with no sessions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a session: `bearer` authenticates as `customer_number`.
    pub fn grant(&self, bearer: &str, customer_number: &str) {
        self.sessions
            .lock()
            .unwrap()
            .insert(bearer.to_string(), customer_number.to_string());
    }
}

impl PortalAuth for MockPortalAuth {
    async fn authenticate_portal_actor(&self, bearer: &str) -> Result<PartnerId> {
        self.sessions
            .lock()
            .unwrap()
            .get(bearer)
            .map(|customer| PartnerId(customer.clone()))
            .ok_or(ConfirmationError::Unauthorized)
    }
}
