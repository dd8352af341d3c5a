//! # Domain Types
//!
//! Records, create inputs and partial updates for the cinema booking backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Movie       │◄──│    Showtime     │◄──│     Ticket      │       │
//! │  │  ─────────────  │ 1 │  ─────────────  │ 1 │  ─────────────  │       │
//! │  │  id             │ * │  id             │ * │  id             │       │
//! │  │  title (unique) │   │  movie_id (FK)  │   │  showtime_id    │       │
//! │  │  genre          │   │  theater        │   │  seat_number    │       │
//! │  │  duration       │   │  start / end    │   │  customer_name  │       │
//! │  │  rating         │   │  price (cents)  │   │                 │       │
//! │  │  release_year   │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Read models: ShowtimeDetails = Showtime + Movie                        │
//! │               TicketDetails   = Ticket + ShowtimeDetails                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Partial Updates
//! `MovieUpdate` and `ShowtimeUpdate` carry only the fields a client sent.
//! `apply` overlays the present fields onto a copy of the stored record and
//! leaves the rest untouched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::schedule::TimeWindow;
use crate::validation::{
    round_rating, validate_customer_name, validate_duration, validate_genre, validate_id,
    validate_price, validate_rating, validate_release_year, validate_seat_number,
    validate_theater, validate_title, ValidationResult,
};

// =============================================================================
// Movie
// =============================================================================

/// A movie in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Movie {
    pub id: i64,

    /// Unique across the catalogue.
    pub title: String,

    pub genre: String,

    /// Runtime in minutes.
    pub duration: i64,

    /// 0.0 - 10.0, one decimal place.
    pub rating: f64,

    pub release_year: i32,
}

/// Input for creating a movie.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub duration: i64,
    pub rating: f64,
    pub release_year: i32,
}

impl NewMovie {
    /// Checks field shapes. `current_year` bounds the release year.
    pub fn validate(&self, current_year: i32) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_genre(&self.genre)?;
        validate_duration(self.duration)?;
        validate_rating(self.rating)?;
        validate_release_year(self.release_year, current_year)?;
        Ok(())
    }

    /// Trims text fields and rounds the rating to one decimal.
    pub fn normalized(self) -> Self {
        NewMovie {
            title: self.title.trim().to_string(),
            genre: self.genre.trim().to_string(),
            rating: round_rating(self.rating),
            ..self
        }
    }
}

/// Partial update for a movie. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MovieUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

impl MovieUpdate {
    /// Checks the shape of every present field.
    pub fn validate(&self, current_year: i32) -> ValidationResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(genre) = &self.genre {
            validate_genre(genre)?;
        }
        if let Some(duration) = self.duration {
            validate_duration(duration)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(year) = self.release_year {
            validate_release_year(year, current_year)?;
        }
        Ok(())
    }

    /// The new title, trimmed, if the update changes it.
    pub fn changed_title(&self, current: &Movie) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| *title != current.title)
    }

    /// Overlays the present fields onto a copy of `current`.
    ///
    /// ## Example
    /// ```rust
    /// use cinema_core::types::{Movie, MovieUpdate};
    ///
    /// let dune = Movie {
    ///     id: 1,
    ///     title: "Dune".into(),
    ///     genre: "Sci-Fi".into(),
    ///     duration: 155,
    ///     rating: 8.0,
    ///     release_year: 2021,
    /// };
    /// let update = MovieUpdate { rating: Some(8.46), ..Default::default() };
    ///
    /// let merged = update.apply(&dune);
    /// assert_eq!(merged.rating, 8.5);
    /// assert_eq!(merged.title, "Dune");
    /// ```
    pub fn apply(&self, current: &Movie) -> Movie {
        Movie {
            id: current.id,
            title: self
                .title
                .as_deref()
                .map_or_else(|| current.title.clone(), |t| t.trim().to_string()),
            genre: self
                .genre
                .as_deref()
                .map_or_else(|| current.genre.clone(), |g| g.trim().to_string()),
            duration: self.duration.unwrap_or(current.duration),
            rating: self.rating.map_or(current.rating, round_rating),
            release_year: self.release_year.unwrap_or(current.release_year),
        }
    }
}

// =============================================================================
// Showtime
// =============================================================================

/// A scheduled screening of a movie in one theater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Showtime {
    pub id: i64,

    pub movie_id: i64,

    pub theater: String,

    #[serde(with = "crate::schedule::wire")]
    #[ts(as = "String")]
    pub start_time: NaiveDateTime,

    #[serde(with = "crate::schedule::wire")]
    #[ts(as = "String")]
    pub end_time: NaiveDateTime,

    /// Ticket price, stored in cents, a decimal number on the wire.
    #[serde(with = "crate::money::price")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(as = "f64")]
    pub price: Money,
}

/// Input for scheduling a showtime.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewShowtime {
    pub movie_id: i64,

    pub theater: String,

    #[serde(with = "crate::schedule::wire")]
    #[ts(as = "String")]
    pub start_time: NaiveDateTime,

    #[serde(with = "crate::schedule::wire")]
    #[ts(as = "String")]
    pub end_time: NaiveDateTime,

    #[serde(with = "crate::money::price")]
    #[ts(as = "f64")]
    pub price: Money,
}

impl NewShowtime {
    /// Checks field shapes (ids, theater name, price).
    pub fn validate(&self) -> ValidationResult<()> {
        validate_id("movie_id", self.movie_id)?;
        validate_theater(&self.theater)?;
        validate_price(self.price)?;
        Ok(())
    }

    /// The requested window, checked for ordering and maximum length.
    pub fn window(&self) -> CoreResult<TimeWindow> {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn normalized(self) -> Self {
        NewShowtime {
            theater: self.theater.trim().to_string(),
            ..self
        }
    }
}

/// Partial update for a showtime. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShowtimeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theater: Option<String>,

    #[serde(
        default,
        with = "crate::schedule::wire::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub start_time: Option<NaiveDateTime>,

    #[serde(
        default,
        with = "crate::schedule::wire::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub end_time: Option<NaiveDateTime>,

    #[serde(
        default,
        with = "crate::money::price::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<f64>")]
    pub price: Option<Money>,
}

impl ShowtimeUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(movie_id) = self.movie_id {
            validate_id("movie_id", movie_id)?;
        }
        if let Some(theater) = &self.theater {
            validate_theater(theater)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    /// True when either bound of the window is being changed.
    pub fn changes_times(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    /// True when the update can move the showtime onto another slot, which
    /// means the overlap rule has to be checked again.
    pub fn changes_slot(&self) -> bool {
        self.changes_times() || self.theater.is_some()
    }

    /// Overlays the present fields onto a copy of `current`.
    pub fn apply(&self, current: &Showtime) -> Showtime {
        Showtime {
            id: current.id,
            movie_id: self.movie_id.unwrap_or(current.movie_id),
            theater: self
                .theater
                .as_deref()
                .map_or_else(|| current.theater.clone(), |t| t.trim().to_string()),
            start_time: self.start_time.unwrap_or(current.start_time),
            end_time: self.end_time.unwrap_or(current.end_time),
            price: self.price.unwrap_or(current.price),
        }
    }
}

/// A showtime with its movie resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShowtimeDetails {
    #[serde(flatten)]
    pub showtime: Showtime,
    pub movie: Movie,
}

// =============================================================================
// Ticket
// =============================================================================

/// A booked seat for one showtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Ticket {
    pub id: i64,
    pub showtime_id: i64,
    /// Free-form seat label ("A1", "12"). Unique per showtime.
    pub seat_number: String,
    pub customer_name: String,
}

/// Input for booking a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTicket {
    pub showtime_id: i64,
    pub seat_number: String,
    pub customer_name: String,
}

impl NewTicket {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_id("showtime_id", self.showtime_id)?;
        validate_seat_number(&self.seat_number)?;
        validate_customer_name(&self.customer_name)?;
        Ok(())
    }

    pub fn normalized(self) -> Self {
        NewTicket {
            showtime_id: self.showtime_id,
            seat_number: self.seat_number.trim().to_string(),
            customer_name: self.customer_name.trim().to_string(),
        }
    }
}

/// A ticket with its showtime (and that showtime's movie) resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketDetails {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub showtime: ShowtimeDetails,
}

// =============================================================================
// Unit Tests
// =============================================================================
