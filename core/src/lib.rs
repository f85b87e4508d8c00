//! # Bookingflow Core
//!
//! This crate implements the booking confirmation workflow for partner
//! course bookings: a partner must confirm or decline a customer's booking
//! within a bounded window, either through a signed email link or through
//! an authenticated portal action. Unanswered bookings are nudged by
//! reminder emails and ultimately escalated into a support ticket queue.
//!
//! ## Architecture
//!
//! The workflow is a small state machine per booking:
//!
//! ```text
//!              ┌───────────┐
//!       ┌──────│  pending  │──────┐
//!       ▼      └─────┬─────┘      ▼
//! ┌───────────┐      │      ┌───────────┐
//! │ confirmed │      │      │ declined  │
//! └───────────┘      ▼      └───────────┘
//!              reminders (1..n)
//!                    │
//!                    ▼
//!              escalation (support ticket, booking stays pending)
//! ```
//!
//! `confirmed` and `declined` are terminal. All transitions originate from
//! `pending` and are applied through a single atomic conditional write, so
//! at most one of two racing confirm/decline attempts can win.
//!
//! External collaborators (notification delivery, ticketing, portal
//! session verification) are abstracted behind provider traits and
//! injected at construction time. Mock implementations live in
//! [`mocks`] and run tests at memory speed.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod booking;
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod scheduler;
pub mod taxonomy;
pub mod token;

// Mock providers poison-unwrap their mutexes; acceptable in test tooling.
#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used)]
pub mod mocks;

// Re-export main types for convenience
pub use booking::{Actor, BookingConfirmation, BookingId, BookingStatus, NewBooking, PartnerId};
pub use config::{ConfirmationConfig, ReminderPolicy};
pub use engine::{ConfirmationEngine, TokenView, TransitionOutcome};
pub use error::{ConfirmationError, Result};
pub use scheduler::{ReminderScheduler, SweepReport};
pub use taxonomy::{DeclineReason, DeclineTaxonomy};
