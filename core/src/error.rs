//! Error types for the booking confirmation workflow.

use thiserror::Error;

/// Result type alias for confirmation operations.
pub type Result<T> = std::result::Result<T, ConfirmationError>;

/// Error taxonomy for the booking confirmation workflow.
///
/// Validation and authorization failures are detected before any write is
/// attempted and returned directly to the caller. Race-loser outcomes
/// ("already confirmed/declined") are deliberately *not* errors — they are
/// modeled as [`crate::engine::TransitionOutcome`] variants because the
/// booking's resulting state is still meaningful to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// No booking matches the given id or token.
    #[error("Booking not found")]
    NotFound,

    /// The confirmation token has expired and the booking is still pending.
    ///
    /// Portal actions are not subject to token expiry; only the email-link
    /// path can fail with this error.
    #[error("Confirmation link has expired")]
    TokenExpired,

    /// The portal actor does not own this booking.
    #[error("Not authorized for this booking")]
    Unauthorized,

    /// The decline reason mandates free-text notes and none were given.
    #[error("Decline reason '{code}' requires notes")]
    NotesRequired {
        /// Reason code the caller supplied.
        code: String,
    },

    /// The decline reason code is unknown or inactive.
    #[error("Unknown or inactive decline reason '{code}'")]
    InvalidReason {
        /// Reason code the caller supplied.
        code: String,
    },

    /// A call to an external collaborator (email, ticketing, session
    /// verification) failed or timed out. Transient; retried on the next
    /// scheduler sweep where applicable.
    #[error("Dispatch to external collaborator failed: {0}")]
    DispatchFailed(String),

    /// The conditional write lost without the booking showing a terminal
    /// state. Indicates a store-level anomaly (e.g. concurrent deletion).
    #[error("Transition lost without a terminal state")]
    Conflict,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl ConfirmationError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bookingflow_core::ConfirmationError;
    /// assert!(ConfirmationError::InvalidReason { code: "x".into() }.is_user_error());
    /// assert!(!ConfirmationError::Database("boom".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotesRequired { .. } | Self::InvalidReason { .. } | Self::TokenExpired
        )
    }

    /// Returns `true` if retrying the operation later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::DispatchFailed(_) | Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_classification() {
        assert!(
            ConfirmationError::NotesRequired {
                code: "other".into()
            }
            .is_user_error()
        );
        assert!(ConfirmationError::TokenExpired.is_user_error());
        assert!(!ConfirmationError::Unauthorized.is_user_error());
        assert!(!ConfirmationError::Conflict.is_user_error());
    }

    #[test]
    fn transient_classification() {
        assert!(ConfirmationError::DispatchFailed("smtp down".into()).is_transient());
        assert!(!ConfirmationError::NotFound.is_transient());
    }
}
