//! # cinema-core: Pure Business Logic for the Cinema Booking Backend
//!
//! This crate contains the booking rules as pure functions with zero I/O
//! dependencies. The stores in `cinema-db` call into it before every write.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cinema Booking Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cinema-api (axum)                            │   │
//! │  │    /movies ──► /showtimes ──► /tickets                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cinema-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ schedule  │  │   money   │  │ validation│  │   │
//! │  │   │  Movie    │  │TimeWindow │  │   Money   │  │  fields   │  │   │
//! │  │   │ Showtime  │  │  overlap  │  │  (cents)  │  │  ranges   │  │   │
//! │  │   │  Ticket   │  │  started  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   cinema-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, Movie/Showtime/Ticket      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records, create inputs and partial updates
//! - [`schedule`] - Showtime windows: ordering, length, overlap, started
//! - [`money`] - Ticket prices in integer cents
//! - [`clock`] - Source of "now" for the started-showtime rule
//! - [`error`] - Domain error types
//! - [`validation`] - Field shape validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cinema_core::schedule::{parse_timestamp, TimeWindow};
//!
//! let first = TimeWindow::new(
//!     parse_timestamp("start_time", "2024-03-20T14:00").unwrap(),
//!     parse_timestamp("end_time", "2024-03-20T16:00").unwrap(),
//! )
//! .unwrap();
//! let second = TimeWindow::new(
//!     parse_timestamp("start_time", "2024-03-20T15:00").unwrap(),
//!     parse_timestamp("end_time", "2024-03-20T17:00").unwrap(),
//! )
//! .unwrap();
//!
//! assert!(first.overlaps(&second));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use schedule::TimeWindow;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest allowed showtime, in minutes (5 hours).
pub const MAX_SHOWTIME_MINUTES: i64 = 5 * 60;

/// Longest allowed movie runtime, in minutes.
pub const MAX_MOVIE_DURATION: i64 = 300;

/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1900;

/// Highest accepted ticket price, in cents ($100.00).
pub const MAX_PRICE_CENTS: i64 = 10_000;
