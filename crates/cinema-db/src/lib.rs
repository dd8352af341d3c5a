//! # cinema-db: Database Layer for the Cinema Booking Backend
//!
//! This crate provides the three stores (movies, showtimes, tickets) on top
//! of SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cinema Booking Data Flow                         │
//! │                                                                         │
//! │  HTTP handler (POST /tickets)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cinema-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ MovieRepo     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ShowtimeRepo  │    │ 001_init.sql │  │   │
//! │  │   │ Write gate    │    │ TicketRepo    │    │              │  │   │
//! │  │   │ Clock         │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/cinema/cinema.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The movie, showtime and ticket stores
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cinema_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cinema.db")).await?;
//!
//! let dune = db.movies().create(new_movie).await?;
//! let showtimes = db.showtimes().find_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, WriteGate};

// Repository re-exports for convenience
pub use repository::movie::MovieRepository;
pub use repository::showtime::ShowtimeRepository;
pub use repository::ticket::TicketRepository;
pub use repository::{MovieLookup, ShowtimeLookup};
