//! # Schedule Module
//!
//! Rules about showtime windows: ordering, maximum length, overlap within a
//! theater, and whether a showtime has already started.
//!
//! ## Overlap Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two windows in the same theater collide when                          │
//! │                                                                         │
//! │      existing.start <= new.end  AND  existing.end >= new.start          │
//! │                                                                         │
//! │  Boundaries are INCLUSIVE: a showtime ending at 16:00 blocks one       │
//! │  starting at 16:00.                                                     │
//! │                                                                         │
//! │  14:00 ─────── 16:00                                                    │
//! │                16:00 ─────── 18:00     overlaps (touching)              │
//! │                      16:01 ─────── 18:00   does not overlap             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Timestamps are wall-clock values with minute precision, written as
//! `YYYY-MM-DDTHH:mm` (e.g. `2024-03-20T14:00`). The [`wire`] module plugs
//! that format into serde.

use chrono::{Duration, NaiveDateTime};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::ValidationResult;
use crate::MAX_SHOWTIME_MINUTES;

/// chrono format string for `YYYY-MM-DDTHH:mm`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

// =============================================================================
// Parsing / Formatting
// =============================================================================

/// Parses a `YYYY-MM-DDTHH:mm` timestamp.
///
/// The shape is checked literally before chrono sees it, so variants chrono
/// would tolerate (seconds, a trailing `Z`, single-digit months) are
/// rejected.
///
/// ## Example
/// ```rust
/// use cinema_core::schedule::parse_timestamp;
///
/// assert!(parse_timestamp("start_time", "2024-03-20T14:00").is_ok());
/// assert!(parse_timestamp("start_time", "2024-03-20 14:00").is_err());
/// assert!(parse_timestamp("start_time", "2024-03-20T14:00:00").is_err());
/// ```
pub fn parse_timestamp(field: &str, value: &str) -> ValidationResult<NaiveDateTime> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be in format YYYY-MM-DDTHH:mm".to_string(),
    };

    if !has_timestamp_shape(value) {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| invalid())
}

fn has_timestamp_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 16
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Formats a timestamp as `YYYY-MM-DDTHH:mm`.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

// =============================================================================
// Time Window
// =============================================================================

/// A validated showtime window: `start < end` and at most five hours long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Builds a window, enforcing ordering and the maximum showtime length.
    ///
    /// ## Errors
    /// - `InvalidTimeWindow` when `start >= end`
    /// - `ShowtimeTooLong` when the window is longer than five hours
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidTimeWindow);
        }

        if end - start > Duration::minutes(MAX_SHOWTIME_MINUTES) {
            return Err(CoreError::ShowtimeTooLong {
                max_hours: MAX_SHOWTIME_MINUTES / 60,
            });
        }

        Ok(TimeWindow { start, end })
    }

    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Inclusive-boundary intersection test.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Inclusive-boundary intersection of `[a_start, a_end]` and `[b_start, b_end]`.
///
/// Works on raw bounds so stored rows can be tested without re-validating
/// them as windows.
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// True once `now` has reached the showtime start.
#[inline]
pub fn has_started(start_time: NaiveDateTime, now: NaiveDateTime) -> bool {
    now >= start_time
}

// =============================================================================
// Serde Adapter
// =============================================================================

/// serde adapter for `YYYY-MM-DDTHH:mm` timestamps.
///
/// ```rust,ignore
/// #[serde(with = "cinema_core::schedule::wire")]
/// pub start_time: NaiveDateTime,
/// ```
pub mod wire {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, has_timestamp_shape, TIMESTAMP_FORMAT};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
    }

    fn parse<E: de::Error>(raw: &str) -> Result<NaiveDateTime, E> {
        if !has_timestamp_shape(raw) {
            return Err(E::custom(format!(
                "'{raw}' must be in format YYYY-MM-DDTHH:mm"
            )));
        }
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| E::custom(format!("'{raw}' is not a valid timestamp: {e}")))
    }

    /// Same adapter for optional fields (partial updates).
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::format_timestamp;

        pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => serializer.serialize_some(&format_timestamp(v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp("t", value).unwrap()
    }

    #[test]
    fn test_parse_timestamp_shape() {
        assert!(parse_timestamp("start_time", "2024-03-20T14:00").is_ok());

        assert!(parse_timestamp("start_time", "").is_err());
        assert!(parse_timestamp("start_time", "2024-3-20T14:00").is_err());
        assert!(parse_timestamp("start_time", "2024-03-20T14:00Z").is_err());
        assert!(parse_timestamp("start_time", "2024-03-20T14:00:00").is_err());
        // Right shape, impossible date
        assert!(parse_timestamp("start_time", "2024-13-40T25:00").is_err());
    }

    #[test]
    fn test_format_round_trips_wire_shape() {
        assert_eq!(format_timestamp(&ts("2024-03-20T09:05")), "2024-03-20T09:05");
    }

    #[test]
    fn test_window_ordering() {
        assert!(matches!(
            TimeWindow::new(ts("2024-03-20T16:00"), ts("2024-03-20T14:00")),
            Err(CoreError::InvalidTimeWindow)
        ));
        assert!(matches!(
            TimeWindow::new(ts("2024-03-20T14:00"), ts("2024-03-20T14:00")),
            Err(CoreError::InvalidTimeWindow)
        ));
    }

    #[test]
    fn test_window_max_length() {
        // Exactly five hours is allowed
        let window = TimeWindow::new(ts("2024-03-20T14:00"), ts("2024-03-20T19:00")).unwrap();
        assert_eq!(window.duration(), Duration::hours(5));

        assert!(matches!(
            TimeWindow::new(ts("2024-03-20T14:00"), ts("2024-03-20T19:01")),
            Err(CoreError::ShowtimeTooLong { max_hours: 5 })
        ));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let base = TimeWindow::new(ts("2024-03-20T14:00"), ts("2024-03-20T16:00")).unwrap();
        let inside = TimeWindow::new(ts("2024-03-20T15:00"), ts("2024-03-20T17:00")).unwrap();
        let touching = TimeWindow::new(ts("2024-03-20T16:00"), ts("2024-03-20T18:00")).unwrap();
        let after = TimeWindow::new(ts("2024-03-20T16:01"), ts("2024-03-20T18:00")).unwrap();
        let before = TimeWindow::new(ts("2024-03-20T11:00"), ts("2024-03-20T13:59")).unwrap();

        assert!(base.overlaps(&inside));
        assert!(inside.overlaps(&base));
        assert!(base.overlaps(&touching));
        assert!(!base.overlaps(&after));
        assert!(!base.overlaps(&before));
    }

    #[test]
    fn test_has_started() {
        let start = ts("2024-03-20T14:00");
        assert!(!has_started(start, ts("2024-03-20T13:59")));
        assert!(has_started(start, start));
        assert!(has_started(start, ts("2024-03-20T14:01")));
    }

    #[test]
    fn test_wire_adapter() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Stamped {
            #[serde(with = "wire")]
            at: NaiveDateTime,
            #[serde(default, with = "wire::option")]
            maybe: Option<NaiveDateTime>,
        }

        let stamped: Stamped = serde_json::from_str(r#"{"at":"2024-03-20T14:00"}"#).unwrap();
        assert_eq!(stamped.at, ts("2024-03-20T14:00"));
        assert!(stamped.maybe.is_none());

        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2024-03-20T14:00","maybe":null}"#);

        assert!(serde_json::from_str::<Stamped>(r#"{"at":"2024-03-20T14:00:00"}"#).is_err());
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"x","maybe":null}"#).is_err());
    }
}
