//! # Repository Module
//!
//! The three stores of the booking backend.
//!
//! ## Dependencies Between Stores
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TicketRepository ──ShowtimeLookup──► ShowtimeRepository               │
//! │                                            │                            │
//! │                                       MovieLookup                       │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                      MovieRepository                    │
//! │                                                                         │
//! │  A store only sees the capability it needs, not the whole store it     │
//! │  depends on. Tests can hand in a stub instead.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MovieRepository`](movie::MovieRepository) - Movie CRUD, unique titles
//! - [`ShowtimeRepository`](showtime::ShowtimeRepository) - Scheduling, overlap rule
//! - [`TicketRepository`](ticket::TicketRepository) - Booking, seat uniqueness, started rule

use std::future::Future;

use cinema_core::{Movie, ShowtimeDetails};

use crate::error::DbResult;

pub mod movie;
pub mod showtime;
pub mod ticket;

/// Resolves a movie reference.
pub trait MovieLookup: Send + Sync {
    fn find_movie(&self, id: i64) -> impl Future<Output = DbResult<Option<Movie>>> + Send;
}

/// Resolves a showtime reference, with its movie.
pub trait ShowtimeLookup: Send + Sync {
    fn find_showtime(
        &self,
        id: i64,
    ) -> impl Future<Output = DbResult<Option<ShowtimeDetails>>> + Send;
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDateTime;
    use cinema_core::schedule::parse_timestamp;
    use cinema_core::{FixedClock, Money, NewMovie, NewShowtime};

    use crate::pool::{Database, DbConfig};

    /// "Now" for every store test.
    pub const NOW: &str = "2024-03-20T12:00";

    pub fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp("t", value).unwrap()
    }

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .with_clock(FixedClock::new(ts(NOW)))
    }

    pub fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            genre: "Sci-Fi".to_string(),
            duration: 155,
            rating: 8.5,
            release_year: 2021,
        }
    }

    pub fn new_showtime(movie_id: i64, theater: &str, start: &str, end: &str) -> NewShowtime {
        NewShowtime {
            movie_id,
            theater: theater.to_string(),
            start_time: ts(start),
            end_time: ts(end),
            price: Money::from_cents(1299),
        }
    }
}
