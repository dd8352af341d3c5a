//! # Validation Module
//!
//! Field shape validation for request payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: JSON deserialization (serde)                                 │
//! │  ├── Field presence and JSON types                                     │
//! │  └── Timestamp pattern YYYY-MM-DDTHH:mm, prices to cents               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lengths (title, genre, theater, customer name)                    │
//! │  └── Ranges (duration, rating, release year, price)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores (cinema-db)                                           │
//! │  ├── Referenced ids exist                                              │
//! │  ├── Title / seat uniqueness, theater overlap                          │
//! │  └── Showtime not started                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  └── UNIQUE and FOREIGN KEY constraints                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes, and measured after trimming.

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_MOVIE_DURATION, MAX_PRICE_CENTS, MIN_RELEASE_YEAR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a trimmed string has between `min` and `max` characters.
///
/// ## Example
/// ```rust
/// use cinema_core::validation::validate_length;
///
/// assert!(validate_length("title", "Dune", 1, 100).is_ok());
/// assert!(validate_length("title", "   ", 1, 100).is_err());
/// ```
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.trim().chars().count();

    if len == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Title must be between 1 and 100 characters.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    validate_length("title", title, 1, 100)
}

/// Genre must be between 1 and 50 characters.
pub fn validate_genre(genre: &str) -> ValidationResult<()> {
    validate_length("genre", genre, 1, 50)
}

/// Theater name must be between 1 and 50 characters.
pub fn validate_theater(theater: &str) -> ValidationResult<()> {
    validate_length("theater", theater, 1, 50)
}

/// Customer name must be between 2 and 50 characters.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_length("customer_name", name, 2, 50)
}

/// Seat numbers are free-form labels ("A1", "12"), at most 10 characters.
pub fn validate_seat_number(seat: &str) -> ValidationResult<()> {
    validate_length("seat_number", seat, 1, 10)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Duration must be between 1 and 300 minutes.
pub fn validate_duration(minutes: i64) -> ValidationResult<()> {
    if !(1..=MAX_MOVIE_DURATION).contains(&minutes) {
        return Err(ValidationError::out_of_range("duration", 1, MAX_MOVIE_DURATION));
    }
    Ok(())
}

/// Rating must be between 0 and 10.
pub fn validate_rating(rating: f64) -> ValidationResult<()> {
    if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
        return Err(ValidationError::out_of_range("rating", 0, 10));
    }
    Ok(())
}

/// Ratings are kept with one decimal place (8.46 → 8.5).
pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// Release year must be between 1900 and the current year.
///
/// ## Example
/// ```rust
/// use cinema_core::validation::validate_release_year;
///
/// assert!(validate_release_year(2021, 2024).is_ok());
/// assert!(validate_release_year(1899, 2024).is_err());
/// assert!(validate_release_year(2025, 2024).is_err());
/// ```
pub fn validate_release_year(year: i32, current_year: i32) -> ValidationResult<()> {
    if year < MIN_RELEASE_YEAR || year > current_year {
        return Err(ValidationError::out_of_range(
            "release_year",
            MIN_RELEASE_YEAR,
            current_year,
        ));
    }
    Ok(())
}

/// Price must be between $0.01 and $100.00.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::out_of_range("price", 0.01, 100));
    }
    Ok(())
}

/// Price as received on the wire, checked before it is rounded to cents.
///
/// `100.004` fails here even though it would round to `100.00`.
pub fn validate_price_amount(amount: f64) -> ValidationResult<()> {
    let max = MAX_PRICE_CENTS as f64 / 100.0;
    if !amount.is_finite() || amount < 0.01 || amount > max {
        return Err(ValidationError::out_of_range("price", 0.01, 100));
    }
    Ok(())
}

/// Referenced ids must be positive.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length_counts_chars() {
        assert!(validate_title("Amélie").is_ok());
        assert!(validate_title(&"é".repeat(100)).is_ok());
        assert!(validate_title(&"é".repeat(101)).is_err());
        assert!(matches!(
            validate_title(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Jo").is_ok());
        assert!(matches!(
            validate_customer_name("J"),
            Err(ValidationError::TooShort { min: 2, .. })
        ));
        assert!(validate_customer_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(300).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(301).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
        assert!(validate_rating(-0.1).is_err());
        assert!(validate_rating(10.1).is_err());
        assert!(validate_rating(f64::NAN).is_err());
        assert_eq!(round_rating(8.46), 8.5);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::from_cents(10_000)).is_ok());
        assert!(validate_price(Money::from_cents(0)).is_err());
        assert!(validate_price(Money::from_cents(10_001)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("movie_id", 1).is_ok());
        assert!(validate_id("movie_id", 0).is_err());
        assert!(validate_id("movie_id", -4).is_err());
    }
}
