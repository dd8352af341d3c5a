//! # Ticket Repository
//!
//! Seat booking and cancellation.
//!
//! ## Booking Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POST /tickets  (under the write gate)                │
//! │                                                                         │
//! │  showtime exists?          no  → 404 ShowtimeNotFound                  │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  now >= start_time?        yes → 400 ShowtimeStarted { Book }          │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  (showtime, seat) taken?   yes → 409 SeatTaken                         │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  INSERT                    UNIQUE (showtime_id, seat_number) backstop  │
//! │                                                                         │
//! │  DELETE /tickets/:id: the same "started" rule applies (Cancel).        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use cinema_core::error::TicketAction;
use cinema_core::schedule::has_started;
use cinema_core::{Clock, CoreError, NewTicket, ShowtimeDetails, Ticket, TicketDetails};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::WriteGate;
use crate::repository::showtime::{ShowtimeRepository, ShowtimeRow, SHOWTIME_DETAILS_COLUMNS};
use crate::repository::ShowtimeLookup;

/// One row of `tickets JOIN showtimes JOIN movies`.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    ticket_id: i64,
    seat_number: String,
    customer_name: String,
    #[sqlx(flatten)]
    showtime: ShowtimeRow,
}

impl From<TicketRow> for TicketDetails {
    fn from(row: TicketRow) -> Self {
        let showtime = ShowtimeDetails::from(row.showtime);
        TicketDetails {
            ticket: Ticket {
                id: row.ticket_id,
                showtime_id: showtime.showtime.id,
                seat_number: row.seat_number,
                customer_name: row.customer_name,
            },
            showtime,
        }
    }
}

fn details_query(filter: &str) -> String {
    format!(
        "SELECT t.id AS ticket_id, t.seat_number, t.customer_name, {SHOWTIME_DETAILS_COLUMNS}
         FROM tickets t
         JOIN showtimes s ON s.id = t.showtime_id
         JOIN movies m ON m.id = s.movie_id
         {filter}"
    )
}

/// Repository for ticket database operations.
///
/// Showtime references are resolved through `S`, which is the showtime store
/// in production.
#[derive(Debug, Clone)]
pub struct TicketRepository<S = ShowtimeRepository> {
    pool: SqlitePool,
    gate: WriteGate,
    clock: Arc<dyn Clock>,
    showtimes: S,
}

impl<S: ShowtimeLookup> TicketRepository<S> {
    /// Creates a new ticket repository.
    pub fn new(pool: SqlitePool, gate: WriteGate, clock: Arc<dyn Clock>, showtimes: S) -> Self {
        TicketRepository {
            pool,
            gate,
            clock,
            showtimes,
        }
    }

    /// Books a seat.
    ///
    /// ## Returns
    /// * `Ok(TicketDetails)` - Stored ticket with showtime and movie
    /// * `Err(Rule(ShowtimeNotFound))` - Referenced showtime doesn't exist
    /// * `Err(Rule(ShowtimeStarted))` - Showtime already started
    /// * `Err(Rule(SeatTaken))` - Seat already booked for that showtime
    pub async fn create(&self, input: NewTicket) -> DbResult<TicketDetails> {
        input.validate()?;
        let input = input.normalized();

        let _gate = self.gate.lock().await;

        let showtime = self
            .showtimes
            .find_showtime(input.showtime_id)
            .await?
            .ok_or(CoreError::ShowtimeNotFound(input.showtime_id))?;

        if has_started(showtime.showtime.start_time, self.clock.now()) {
            warn!(
                showtime_id = input.showtime_id,
                "Rejected booking for a started showtime"
            );
            return Err(CoreError::ShowtimeStarted {
                action: TicketAction::Book,
            }
            .into());
        }

        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets WHERE showtime_id = ?1 AND seat_number = ?2",
        )
        .bind(input.showtime_id)
        .bind(&input.seat_number)
        .fetch_one(&self.pool)
        .await?;

        if taken > 0 {
            warn!(
                showtime_id = input.showtime_id,
                seat = %input.seat_number,
                "Rejected double booking"
            );
            return Err(CoreError::SeatTaken {
                seat: input.seat_number,
            }
            .into());
        }

        debug!(
            showtime_id = input.showtime_id,
            seat = %input.seat_number,
            "Inserting ticket"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO tickets (showtime_id, seat_number, customer_name)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(input.showtime_id)
        .bind(&input.seat_number)
        .bind(&input.customer_name)
        .execute(&self.pool)
        .await?;

        Ok(TicketDetails {
            ticket: Ticket {
                id: result.last_insert_rowid(),
                showtime_id: input.showtime_id,
                seat_number: input.seat_number,
                customer_name: input.customer_name,
            },
            showtime,
        })
    }

    /// Lists all tickets with showtime and movie.
    pub async fn find_all(&self) -> DbResult<Vec<TicketDetails>> {
        let rows = sqlx::query_as::<_, TicketRow>(&details_query("ORDER BY t.id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed tickets");
        Ok(rows.into_iter().map(TicketDetails::from).collect())
    }

    /// Gets a ticket with showtime and movie.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<TicketDetails>> {
        let row = sqlx::query_as::<_, TicketRow>(&details_query("WHERE t.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TicketDetails::from))
    }

    /// Gets a ticket, failing with `TicketNotFound`.
    pub async fn find_one(&self, id: i64) -> DbResult<TicketDetails> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::TicketNotFound(id).into())
    }

    /// Lists the tickets booked for one showtime.
    ///
    /// An unknown showtime simply has no tickets.
    pub async fn find_by_showtime(&self, showtime_id: i64) -> DbResult<Vec<TicketDetails>> {
        let rows = sqlx::query_as::<_, TicketRow>(&details_query(
            "WHERE t.showtime_id = ?1 ORDER BY t.seat_number",
        ))
        .bind(showtime_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(showtime_id, count = rows.len(), "Listed tickets for showtime");
        Ok(rows.into_iter().map(TicketDetails::from).collect())
    }

    /// Cancels a ticket.
    ///
    /// ## Returns
    /// * `Err(Rule(TicketNotFound))` - No ticket with that id
    /// * `Err(Rule(ShowtimeStarted))` - Its showtime already started
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let _gate = self.gate.lock().await;

        let ticket = self.find_one(id).await?;

        if has_started(ticket.showtime.showtime.start_time, self.clock.now()) {
            warn!(id, "Rejected cancellation for a started showtime");
            return Err(CoreError::ShowtimeStarted {
                action: TicketAction::Cancel,
            }
            .into());
        }

        debug!(id, "Deleting ticket");

        sqlx::query("DELETE FROM tickets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
