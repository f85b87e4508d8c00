//! Portal session verification trait.
//!
//! Authentication itself is an external concern; the workflow only needs
//! to resolve a bearer credential to the owning partner before allowing a
//! portal-actor transition.

use crate::booking::PartnerId;
use crate::error::Result;

/// Verifies portal sessions and resolves the acting partner.
pub trait PortalAuth: Send + Sync {
    /// Resolve a bearer credential to the authenticated partner.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfirmationError::Unauthorized`] for unknown or
    /// expired sessions, or a transport error if the verification service
    /// is unreachable.
    fn authenticate_portal_actor(
        &self,
        bearer: &str,
    ) -> impl std::future::Future<Output = Result<PartnerId>> + Send;
}
