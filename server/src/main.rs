//! Booking confirmation HTTP server.
//!
//! Wires the PostgreSQL store, the notification/ticketing/auth providers
//! and the HTTP router together, and drives the reminder sweep on a
//! timer.

mod config;

use bookingflow_core::booking::BookingConfirmation;
use bookingflow_core::providers::{
    BookingStore, ConsoleNotifier, HttpPortalAuth, NotificationDispatcher, OdooTicketing,
    SmtpNotifier, TicketingProvider,
};
use bookingflow_core::{
    ConfirmationConfig, ConfirmationEngine, DeclineTaxonomy, ReminderPolicy, ReminderScheduler,
};
use bookingflow_postgres::PgBookingStore;
use bookingflow_web::{AppState, confirmation_router};
use chrono::Utc;
use config::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookingflow=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking confirmation server");

    // Load configuration
    let config = Config::from_env();
    info!(
        database_url = %config.database.url,
        email_mode = %config.email.mode,
        sweep_interval_minutes = config.workflow.sweep_interval_minutes,
        "Configuration loaded"
    );

    // Connect to the booking store
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;
    let store = PgBookingStore::new(pool);
    store.migrate().await?;
    info!("Database connected and migrated");

    // Build providers
    let notifier = build_notifier(&config);
    let ticketing = OdooTicketing::new(
        &config.odoo.base_url,
        config.odoo.database.clone(),
        config.odoo.uid,
        config.odoo.api_key.clone(),
        config.odoo.helpdesk_team_id,
    );
    let auth = HttpPortalAuth::new(&config.portal.auth_base_url);

    // Build the workflow
    let engine = ConfirmationEngine::new(
        store.clone(),
        DeclineTaxonomy::standard(),
        ConfirmationConfig::new()
            .with_token_ttl(chrono::Duration::days(config.workflow.token_ttl_days)),
    );
    let policy = ReminderPolicy::new()
        .with_first_reminder_after(chrono::Duration::hours(
            config.workflow.first_reminder_after_hours,
        ))
        .with_reminder_interval(chrono::Duration::hours(config.workflow.reminder_interval_hours))
        .with_max_reminders(config.workflow.max_reminders)
        .with_escalation_grace(chrono::Duration::hours(config.workflow.escalation_grace_hours))
        .with_dispatch_timeout(std::time::Duration::from_secs(
            config.workflow.dispatch_timeout_secs,
        ));
    let scheduler = ReminderScheduler::new(
        store.clone(),
        notifier.clone(),
        ticketing.clone(),
        policy,
    );

    // Drive the sweep on a timer; the /internal/sweep endpoint remains
    // available for external cron setups.
    spawn_sweep_timer(scheduler.clone(), config.workflow.sweep_interval_minutes);

    // Build application state and router
    let state = Arc::new(AppState::new(engine, scheduler, store, notifier, auth));
    let app = confirmation_router(state);

    // Start the HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Pick the notification dispatcher from configuration.
fn build_notifier(config: &Config) -> AnyNotifier {
    if config.email.mode == "smtp" {
        info!(
            smtp_server = %config.email.smtp_server,
            "Using SMTP notification dispatcher"
        );
        AnyNotifier::Smtp(SmtpNotifier::new(
            config.email.smtp_server.clone(),
            config.email.smtp_port,
            config.email.smtp_username.clone(),
            config.email.smtp_password.clone(),
            config.email.from_email.clone(),
            config.email.from_name.clone(),
            config.workflow.base_url.clone(),
        ))
    } else {
        info!("Using console notification dispatcher");
        AnyNotifier::Console(ConsoleNotifier::new(config.workflow.base_url.clone()))
    }
}

/// Configuration-selected notification dispatcher.
#[derive(Clone)]
enum AnyNotifier {
    Console(ConsoleNotifier),
    Smtp(SmtpNotifier),
}

impl NotificationDispatcher for AnyNotifier {
    async fn send_confirmation_request(
        &self,
        booking: &BookingConfirmation,
    ) -> bookingflow_core::Result<()> {
        match self {
            Self::Console(n) => n.send_confirmation_request(booking).await,
            Self::Smtp(n) => n.send_confirmation_request(booking).await,
        }
    }

    async fn send_reminder(
        &self,
        booking: &BookingConfirmation,
        ordinal: i32,
        hours_waiting: i64,
    ) -> bookingflow_core::Result<()> {
        match self {
            Self::Console(n) => n.send_reminder(booking, ordinal, hours_waiting).await,
            Self::Smtp(n) => n.send_reminder(booking, ordinal, hours_waiting).await,
        }
    }
}

/// Run the reminder/escalation sweep on a fixed interval.
fn spawn_sweep_timer<S, N, T>(scheduler: ReminderScheduler<S, N, T>, interval_minutes: u64)
where
    S: BookingStore + Clone + Send + Sync + 'static,
    N: NotificationDispatcher + Clone + Send + Sync + 'static,
    T: TicketingProvider + Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(interval_minutes * 60));
        // The first tick fires immediately; skip it so a restart doesn't
        // double up with an external cron trigger.
        interval.tick().await;

        loop {
            interval.tick().await;
            match scheduler.run_sweep(Utc::now()).await {
                Ok(report) => info!(
                    scanned = report.scanned,
                    reminders = report.reminders_sent,
                    escalations = report.escalations,
                    failures = report.failures,
                    "Scheduled sweep finished"
                ),
                Err(e) => error!(error = %e, "Scheduled sweep failed"),
            }
        }
    });

    info!(interval_minutes, "Sweep timer started");
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or SIGTERM.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
