//! Confirmation transition engine.
//!
//! The single authority for moving a booking out of `pending`. The engine
//! separates "may this actor act on this booking" (authorization and
//! validation, checked up front, no writes) from "did this transition win
//! the race" (decided by the store's atomic conditional write). Two
//! simultaneous requests cannot both succeed, and the loser is told the
//! booking's actual resulting state instead of an error.

use crate::booking::{
    Actor, BookingConfirmation, BookingId, BookingStatus, NewBooking, PartnerId,
};
use crate::config::ConfirmationConfig;
use crate::error::{ConfirmationError, Result};
use crate::providers::{BookingStore, Resolution};
use crate::taxonomy::DeclineTaxonomy;
use crate::token;
use chrono::Utc;
use tracing::{info, warn};

/// Result of a confirm/decline attempt that passed validation.
///
/// `AlreadyConfirmed`/`AlreadyDeclined` mean another actor resolved the
/// booking first — benign for the end user, but distinct from `Applied`
/// for logging and response shaping.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// This call won the race; the booking now carries the new state.
    Applied(BookingConfirmation),
    /// The booking was already confirmed by an earlier action.
    AlreadyConfirmed(BookingConfirmation),
    /// The booking was already declined by an earlier action.
    AlreadyDeclined(BookingConfirmation),
}

impl TransitionOutcome {
    /// The booking state after the attempt, whoever won.
    #[must_use]
    pub const fn booking(&self) -> &BookingConfirmation {
        match self {
            Self::Applied(b) | Self::AlreadyConfirmed(b) | Self::AlreadyDeclined(b) => b,
        }
    }

    /// Returns `true` if this call performed the transition.
    #[must_use]
    pub const fn applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Read-only view behind the email-link landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenView {
    /// The booking the token belongs to, in its current state.
    pub booking: BookingConfirmation,
    /// Whether the token validity window has passed. An expired link on a
    /// resolved booking still shows the resolved status.
    pub token_expired: bool,
}

/// The confirmation transition engine.
///
/// Holds the store handle, the decline taxonomy and the token
/// configuration; constructed once at startup and shared.
#[derive(Debug, Clone)]
pub struct ConfirmationEngine<S> {
    store: S,
    taxonomy: DeclineTaxonomy,
    config: ConfirmationConfig,
}

impl<S: BookingStore> ConfirmationEngine<S> {
    /// Create a new engine.
    #[must_use]
    pub const fn new(store: S, taxonomy: DeclineTaxonomy, config: ConfirmationConfig) -> Self {
        Self {
            store,
            taxonomy,
            config,
        }
    }

    /// The decline taxonomy this engine validates against.
    #[must_use]
    pub const fn taxonomy(&self) -> &DeclineTaxonomy {
        &self.taxonomy
    }

    /// Register a booking arriving from the order source.
    ///
    /// Mints the confirmation token, stamps its validity window and
    /// persists the pending record. Sending the initial confirmation
    /// request is the caller's job — dispatch stays decoupled from
    /// persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::Database`] if the record cannot be
    /// persisted.
    pub async fn register(&self, intake: NewBooking) -> Result<BookingConfirmation> {
        let now = Utc::now();
        let booking = BookingConfirmation::new(
            intake,
            token::mint_token(),
            now + self.config.token_ttl,
            now,
        );

        self.store.insert(&booking).await?;

        info!(
            booking_id = %booking.id,
            order = %booking.order_number,
            customer = %booking.customer_number,
            "Booking registered, awaiting confirmation"
        );

        Ok(booking)
    }

    /// Read-only landing-page view for an email link.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::NotFound`] for an unknown token.
    pub async fn status_by_token(&self, token: &str) -> Result<TokenView> {
        let booking = self
            .store
            .find_by_token(token)
            .await?
            .ok_or(ConfirmationError::NotFound)?;

        Ok(TokenView {
            token_expired: booking.token_expired(Utc::now()),
            booking,
        })
    }

    /// Confirm a booking via its email-link token.
    ///
    /// # Errors
    ///
    /// - [`ConfirmationError::NotFound`] for an unknown token
    /// - [`ConfirmationError::TokenExpired`] if the booking is still
    ///   pending but the token window has passed
    pub async fn confirm_by_token(&self, token: &str) -> Result<TransitionOutcome> {
        let access = self.resolve_token_actor(token).await?;
        match access {
            ActorAccess::Resolved(outcome) => Ok(outcome),
            ActorAccess::Pending(booking) => {
                self.apply_confirm(booking, Actor::EmailToken).await
            }
        }
    }

    /// Decline a booking via its email-link token.
    ///
    /// # Errors
    ///
    /// Same as [`Self::confirm_by_token`], plus
    /// [`ConfirmationError::InvalidReason`] and
    /// [`ConfirmationError::NotesRequired`].
    pub async fn decline_by_token(
        &self,
        token: &str,
        reason_code: &str,
        notes: Option<&str>,
    ) -> Result<TransitionOutcome> {
        let (reason, notes) = self.validate_decline(reason_code, notes)?;
        let access = self.resolve_token_actor(token).await?;
        match access {
            ActorAccess::Resolved(outcome) => Ok(outcome),
            ActorAccess::Pending(booking) => {
                self.apply_decline(booking, Actor::EmailToken, reason, notes)
                    .await
            }
        }
    }

    /// Confirm a booking as the authenticated owning partner.
    ///
    /// Portal actions are not subject to token expiry.
    ///
    /// # Errors
    ///
    /// - [`ConfirmationError::NotFound`] for an unknown booking
    /// - [`ConfirmationError::Unauthorized`] if the partner does not own
    ///   the booking
    pub async fn confirm_from_portal(
        &self,
        id: BookingId,
        partner: &PartnerId,
    ) -> Result<TransitionOutcome> {
        let access = self.resolve_portal_actor(id, partner).await?;
        match access {
            ActorAccess::Resolved(outcome) => Ok(outcome),
            ActorAccess::Pending(booking) => self.apply_confirm(booking, Actor::Portal).await,
        }
    }

    /// Decline a booking as the authenticated owning partner.
    ///
    /// # Errors
    ///
    /// Same as [`Self::confirm_from_portal`], plus
    /// [`ConfirmationError::InvalidReason`] and
    /// [`ConfirmationError::NotesRequired`].
    pub async fn decline_from_portal(
        &self,
        id: BookingId,
        partner: &PartnerId,
        reason_code: &str,
        notes: Option<&str>,
    ) -> Result<TransitionOutcome> {
        let (reason, notes) = self.validate_decline(reason_code, notes)?;
        let access = self.resolve_portal_actor(id, partner).await?;
        match access {
            ActorAccess::Resolved(outcome) => Ok(outcome),
            ActorAccess::Pending(booking) => {
                self.apply_decline(booking, Actor::Portal, reason, notes).await
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve the token path: unknown token, already-resolved booking, or
    /// a pending booking with a live token.
    async fn resolve_token_actor(&self, token: &str) -> Result<ActorAccess> {
        let booking = self
            .store
            .find_by_token(token)
            .await?
            .ok_or(ConfirmationError::NotFound)?;

        if booking.status.is_terminal() {
            // An expired or reused link on a resolved booking is answered
            // with the booking's actual state, not an error.
            return Ok(ActorAccess::Resolved(Self::already_resolved(booking)?));
        }

        if booking.token_expired(Utc::now()) {
            return Err(ConfirmationError::TokenExpired);
        }

        Ok(ActorAccess::Pending(booking))
    }

    /// Resolve the portal path: ownership is checked before anything else
    /// is revealed about the booking.
    async fn resolve_portal_actor(
        &self,
        id: BookingId,
        partner: &PartnerId,
    ) -> Result<ActorAccess> {
        let booking = self
            .store
            .get(id)
            .await?
            .ok_or(ConfirmationError::NotFound)?;

        if booking.customer_number != partner.0 {
            warn!(
                booking_id = %booking.id,
                partner = %partner,
                "Portal actor does not own booking"
            );
            return Err(ConfirmationError::Unauthorized);
        }

        if booking.status.is_terminal() {
            return Ok(ActorAccess::Resolved(Self::already_resolved(booking)?));
        }

        Ok(ActorAccess::Pending(booking))
    }

    fn validate_decline(
        &self,
        reason_code: &str,
        notes: Option<&str>,
    ) -> Result<(String, Option<String>)> {
        let reason = self
            .taxonomy
            .active(reason_code)
            .ok_or_else(|| ConfirmationError::InvalidReason {
                code: reason_code.to_string(),
            })?;

        let trimmed = notes
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);

        if reason.requires_notes && trimmed.is_none() {
            return Err(ConfirmationError::NotesRequired {
                code: reason.code.clone(),
            });
        }

        Ok((reason.code.clone(), trimmed))
    }

    async fn apply_confirm(
        &self,
        booking: BookingConfirmation,
        actor: Actor,
    ) -> Result<TransitionOutcome> {
        let resolution = Resolution::Confirmed {
            at: Utc::now(),
            by: actor,
        };
        self.apply(booking, resolution).await
    }

    async fn apply_decline(
        &self,
        booking: BookingConfirmation,
        actor: Actor,
        reason: String,
        notes: Option<String>,
    ) -> Result<TransitionOutcome> {
        let resolution = Resolution::Declined {
            at: Utc::now(),
            by: actor,
            reason,
            notes,
        };
        self.apply(booking, resolution).await
    }

    /// Apply a validated resolution through the store's conditional write
    /// and report who won.
    async fn apply(
        &self,
        booking: BookingConfirmation,
        resolution: Resolution,
    ) -> Result<TransitionOutcome> {
        let won = self.store.try_transition(booking.id, resolution).await?;

        let current = self
            .store
            .get(booking.id)
            .await?
            .ok_or(ConfirmationError::NotFound)?;

        if won {
            info!(
                booking_id = %current.id,
                status = current.status.as_str(),
                "Booking resolved"
            );
            Ok(TransitionOutcome::Applied(current))
        } else {
            info!(
                booking_id = %current.id,
                status = current.status.as_str(),
                "Transition lost the race, booking already resolved"
            );
            Self::already_resolved(current)
        }
    }

    /// Classify a booking that is (or should be) in a terminal state.
    fn already_resolved(booking: BookingConfirmation) -> Result<TransitionOutcome> {
        match booking.status {
            BookingStatus::Confirmed => Ok(TransitionOutcome::AlreadyConfirmed(booking)),
            BookingStatus::Declined => Ok(TransitionOutcome::AlreadyDeclined(booking)),
            BookingStatus::Pending => Err(ConfirmationError::Conflict),
        }
    }
}

/// Outcome of actor resolution: either the booking is still open for this
/// actor, or it is already resolved and the outcome is final.
enum ActorAccess {
    Pending(BookingConfirmation),
    Resolved(TransitionOutcome),
}
