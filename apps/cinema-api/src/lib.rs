//! # Cinema API
//!
//! REST server over the cinema booking stores.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cinema API Server                               │
//! │                                                                         │
//! │  Client ──► request id ──► trace ──► handlers ──► cinema-db ──► SQLite │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                                     ApiError                            │
//! │                               { code, message } JSON                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables, see [`config`]:
//! - `CINEMA_HOST` / `CINEMA_PORT` - Listen address (default: 0.0.0.0:3000)
//! - `CINEMA_DB_PATH` - SQLite file (default: platform data dir)
//! - `CINEMA_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `CINEMA_DB_CONNECT_TIMEOUT_SECS` - Pool acquire timeout (default: 30)
//! - `RUST_LOG` - Log filter (default: `info,cinema=debug,sqlx=warn`)

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;

use cinema_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

