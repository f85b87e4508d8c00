//! Axum HTTP surface for the booking confirmation workflow.
//!
//! The handlers are a thin imperative shell: extract request data, call
//! the engine or scheduler, map the result to an HTTP response. All
//! workflow rules live in `bookingflow-core`; nothing here mutates a
//! booking directly.
//!
//! # Entry points
//!
//! - `GET  /api/v1/confirmations/token/:token` — email-link landing view
//! - `POST /api/v1/confirmations/token/:token/confirm`
//! - `POST /api/v1/confirmations/token/:token/decline`
//! - `POST /api/v1/confirmations/:id/confirm` — portal, bearer session
//! - `POST /api/v1/confirmations/:id/decline` — portal, bearer session
//! - `GET  /api/v1/decline-reasons` — active reasons, localized
//! - `POST /api/v1/bookings` — registration intake from the order source
//! - `POST /internal/sweep` — run one reminder/escalation sweep
//! - `GET  /health`, `GET /health/ready`

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::BearerToken;
pub use router::confirmation_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
