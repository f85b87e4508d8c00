//! PostgreSQL implementation of the booking store.
//!
//! All status transitions go through single conditional `UPDATE`
//! statements (`... WHERE status = 'pending'`), so the at-most-one-winner
//! invariant holds without any application-side locking: the row lock
//! taken by the first update decides the race.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use bookingflow_core::booking::{Actor, BookingConfirmation, BookingId, BookingStatus};
use bookingflow_core::error::{ConfirmationError, Result};
use bookingflow_core::providers::{BookingStore, Resolution};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

/// Column list shared by every `SELECT` on `booking_confirmations`.
const BOOKING_COLUMNS: &str = "\
    id, order_id, order_item_id, order_number, customer_number, \
    customer_email, course_title, course_date, status, \
    confirmation_token, token_expires_at, \
    confirmed_at, confirmed_by, declined_at, declined_by, \
    decline_reason, decline_notes, \
    reminder_count, last_reminder_at, escalated_at, odoo_ticket_id, \
    created_at, updated_at";

/// PostgreSQL-backed booking store.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a store on an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ConfirmationError::Database(e.to_string()))
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Convert a database row to a [`BookingConfirmation`].
    fn row_to_booking(row: &PgRow) -> Result<BookingConfirmation> {
        let status_str: String = row.get("status");
        let status = BookingStatus::parse(&status_str)?;

        let confirmed_by = row
            .get::<Option<String>, _>("confirmed_by")
            .map(|s| Actor::parse(&s))
            .transpose()?;
        let declined_by = row
            .get::<Option<String>, _>("declined_by")
            .map(|s| Actor::parse(&s))
            .transpose()?;

        Ok(BookingConfirmation {
            id: BookingId(row.get("id")),
            order_id: row.get("order_id"),
            order_item_id: row.get("order_item_id"),
            order_number: row.get("order_number"),
            customer_number: row.get("customer_number"),
            customer_email: row.get("customer_email"),
            course_title: row.get("course_title"),
            course_date: row.get("course_date"),
            status,
            confirmation_token: row.get("confirmation_token"),
            token_expires_at: row.get("token_expires_at"),
            confirmed_at: row.get("confirmed_at"),
            confirmed_by,
            declined_at: row.get("declined_at"),
            declined_by,
            decline_reason: row.get("decline_reason"),
            decline_notes: row.get("decline_notes"),
            reminder_count: row.get("reminder_count"),
            last_reminder_at: row.get("last_reminder_at"),
            escalated_at: row.get("escalated_at"),
            odoo_ticket_id: row.get("odoo_ticket_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

impl BookingStore for PgBookingStore {
    async fn insert(&self, booking: &BookingConfirmation) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO booking_confirmations (
                id, order_id, order_item_id, order_number, customer_number,
                customer_email, course_title, course_date, status,
                confirmation_token, token_expires_at, reminder_count,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(booking.id.0)
        .bind(booking.order_id)
        .bind(booking.order_item_id)
        .bind(&booking.order_number)
        .bind(&booking.customer_number)
        .bind(&booking.customer_email)
        .bind(&booking.course_title)
        .bind(booking.course_date)
        .bind(booking.status.as_str())
        .bind(&booking.confirmation_token)
        .bind(booking.token_expires_at)
        .bind(booking.reminder_count)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        tracing::info!(
            booking_id = %booking.id,
            order = %booking.order_number,
            "Booking confirmation persisted"
        );

        metrics::counter!("booking_confirmations.registered").increment(1);

        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<BookingConfirmation>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking_confirmations WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<BookingConfirmation>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking_confirmations WHERE confirmation_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn list_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<BookingConfirmation>> {
        let rows = sqlx::query(&format!(
            "
            SELECT {BOOKING_COLUMNS}
            FROM booking_confirmations
            WHERE status = 'pending' AND created_at <= $1
            ORDER BY created_at ASC
            "
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn try_transition(&self, id: BookingId, resolution: Resolution) -> Result<bool> {
        let result = match resolution {
            Resolution::Confirmed { at, by } => {
                sqlx::query(
                    r"
                    UPDATE booking_confirmations
                    SET status = 'confirmed',
                        confirmed_at = $2,
                        confirmed_by = $3,
                        updated_at = $2
                    WHERE id = $1 AND status = 'pending'
                    ",
                )
                .bind(id.0)
                .bind(at)
                .bind(by.as_str())
                .execute(&self.pool)
                .await
            }
            Resolution::Declined {
                at,
                by,
                reason,
                notes,
            } => {
                sqlx::query(
                    r"
                    UPDATE booking_confirmations
                    SET status = 'declined',
                        declined_at = $2,
                        declined_by = $3,
                        decline_reason = $4,
                        decline_notes = $5,
                        updated_at = $2
                    WHERE id = $1 AND status = 'pending'
                    ",
                )
                .bind(id.0)
                .bind(at)
                .bind(by.as_str())
                .bind(reason)
                .bind(notes)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        let won = result.rows_affected() == 1;
        if won {
            metrics::counter!("booking_confirmations.resolved").increment(1);
        } else {
            metrics::counter!("booking_confirmations.transition_lost").increment(1);
        }

        Ok(won)
    }

    async fn increment_reminder(&self, id: BookingId, sent_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r"
            UPDATE booking_confirmations
            SET reminder_count = reminder_count + 1,
                last_reminder_at = $2,
                updated_at = $2
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(id.0)
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        metrics::counter!("booking_confirmations.reminders").increment(1);

        Ok(())
    }

    async fn mark_escalated(&self, id: BookingId, ticket_id: i64, at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE booking_confirmations
            SET escalated_at = $2,
                odoo_ticket_id = $3,
                updated_at = $2
            WHERE id = $1 AND escalated_at IS NULL
            ",
        )
        .bind(id.0)
        .bind(at)
        .bind(ticket_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        if result.rows_affected() == 1 {
            tracing::warn!(
                booking_id = %id,
                ticket_id = ticket_id,
                "Booking escalated to support queue"
            );
            metrics::counter!("booking_confirmations.escalated").increment(1);
        }

        Ok(())
    }

    async fn count_pending(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM booking_confirmations
            WHERE status = 'pending'
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ConfirmationError::Database(e.to_string()))?;

        Ok(count)
    }
}
