//! Workflow providers.
//!
//! This module defines traits for all external dependencies of the
//! confirmation workflow, plus the shipped implementations. The engine
//! and scheduler depend only on the traits; concrete providers are
//! injected at startup — no ambient singletons.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: PostgreSQL store, SMTP delivery, Odoo ticketing
//! - **Development**: console delivery that just logs

pub mod console_notifier;
pub mod http_portal;
pub mod notifier;
pub mod odoo;
pub mod portal;
pub mod smtp_notifier;
pub mod store;
pub mod ticketing;

pub use console_notifier::ConsoleNotifier;
pub use http_portal::HttpPortalAuth;
pub use notifier::NotificationDispatcher;
pub use odoo::OdooTicketing;
pub use portal::PortalAuth;
pub use smtp_notifier::SmtpNotifier;
pub use store::{BookingStore, Resolution};
pub use ticketing::TicketingProvider;
