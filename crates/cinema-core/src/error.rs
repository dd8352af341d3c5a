//! # Error Types
//!
//! Domain-specific error types for cinema-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cinema-core errors (this file)                                        │
//! │  ├── CoreError        - Booking rule violations                        │
//! │  └── ValidationError  - Input shape failures                           │
//! │                                                                         │
//! │  cinema-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  cinema-api errors                                                     │
//! │  └── ApiError         - What HTTP clients see (status + code)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` belongs to exactly one [`ErrorKind`], which is what the
//! HTTP layer turns into a status code.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::schedule::format_timestamp;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced id does not exist.
    NotFound,
    /// The request collides with existing state (uniqueness, overlap).
    Conflict,
    /// The request is malformed or breaks a rule on its own.
    BadRequest,
}

// =============================================================================
// Core Error
// =============================================================================

/// What a showtime-started check was protecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Book,
    Cancel,
}

impl TicketAction {
    fn verb(self) -> &'static str {
        match self {
            TicketAction::Book => "book",
            TicketAction::Cancel => "cancel",
        }
    }
}

/// Core business logic errors.
///
/// These errors represent booking rule violations. They are raised before
/// any write is committed, so a failed request never leaves partial state.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Movie with ID {0} not found")]
    MovieNotFound(i64),

    #[error("Showtime with ID {0} not found")]
    ShowtimeNotFound(i64),

    #[error("Ticket with ID {0} not found")]
    TicketNotFound(i64),

    /// Another movie already uses this title.
    #[error("Movie with title \"{title}\" already exists")]
    DuplicateTitle { title: String },

    /// The requested slot intersects an existing showtime in the theater.
    ///
    /// ## User Workflow
    /// ```text
    /// T1: 14:00 ──────── 16:00
    ///            15:00 ──────── 17:00   ← requested
    ///      │
    ///      ▼
    /// ShowtimeOverlap { theater: "T1", start: 14:00, end: 16:00 }
    /// ```
    #[error(
        "There is already a showtime in theater {theater} between {} and {}",
        format_timestamp(.start),
        format_timestamp(.end)
    )]
    ShowtimeOverlap {
        theater: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Seat {seat} is already booked for this showtime")]
    SeatTaken { seat: String },

    #[error("End time must be after start time")]
    InvalidTimeWindow,

    #[error("Showtime duration cannot exceed {max_hours} hours")]
    ShowtimeTooLong { max_hours: i64 },

    #[error("Cannot {} tickets for a showtime that has already started", .action.verb())]
    ShowtimeStarted { action: TicketAction },

    #[error("Movie with ID {0} still has scheduled showtimes")]
    MovieHasShowtimes(i64),

    #[error("Showtime with ID {0} still has booked tickets")]
    ShowtimeHasTickets(i64),

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for transport layers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::MovieNotFound(_)
            | CoreError::ShowtimeNotFound(_)
            | CoreError::TicketNotFound(_) => ErrorKind::NotFound,

            CoreError::DuplicateTitle { .. }
            | CoreError::ShowtimeOverlap { .. }
            | CoreError::SeatTaken { .. }
            | CoreError::MovieHasShowtimes(_)
            | CoreError::ShowtimeHasTickets(_) => ErrorKind::Conflict,

            CoreError::InvalidTimeWindow
            | CoreError::ShowtimeTooLong { .. }
            | CoreError::ShowtimeStarted { .. }
            | CoreError::Validation(_) => ErrorKind::BadRequest,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request fields don't meet shape requirements.
/// Used for early validation before any store is consulted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a timestamp that is not `YYYY-MM-DDTHH:mm`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an OutOfRange error from any displayable bounds.
    pub fn out_of_range(
        field: impl Into<String>,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::parse_timestamp;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateTitle {
            title: "Dune".to_string(),
        };
        assert_eq!(err.to_string(), "Movie with title \"Dune\" already exists");

        let err = CoreError::ShowtimeStarted {
            action: TicketAction::Cancel,
        };
        assert_eq!(
            err.to_string(),
            "Cannot cancel tickets for a showtime that has already started"
        );
    }

    #[test]
    fn test_overlap_message_uses_wire_format() {
        let err = CoreError::ShowtimeOverlap {
            theater: "T1".to_string(),
            start: parse_timestamp("start_time", "2024-03-20T14:00").unwrap(),
            end: parse_timestamp("end_time", "2024-03-20T16:00").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "There is already a showtime in theater T1 between 2024-03-20T14:00 and 2024-03-20T16:00"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::MovieNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::SeatTaken { seat: "A1".into() }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(CoreError::ShowtimeHasTickets(3).kind(), ErrorKind::Conflict);
        assert_eq!(CoreError::InvalidTimeWindow.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::BadRequest);
        assert_eq!(core_err.to_string(), "title is required");
    }
}
