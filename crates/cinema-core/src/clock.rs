//! # Clock
//!
//! Source of "now" for the started-showtime rule.
//!
//! Showtimes are stored as wall-clock times without a zone, so "now" is the
//! server's local wall-clock time as well. Reading the system time is the
//! only ambient input the booking rules need; injecting it keeps the rules
//! deterministic under test.

use std::fmt::Debug;

use chrono::{Local, NaiveDateTime};

/// Provides the current wall-clock time.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The real clock (server local time).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fixed clock for deterministic tests.
///
/// ## Example
/// ```rust
/// use cinema_core::clock::{Clock, FixedClock};
/// use cinema_core::schedule::parse_timestamp;
///
/// let at = parse_timestamp("now", "2024-03-20T12:00").unwrap();
/// let clock = FixedClock::new(at);
/// assert_eq!(clock.now(), at);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: NaiveDateTime,
}

impl FixedClock {
    pub const fn new(time: NaiveDateTime) -> Self {
        FixedClock { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time
    }
}
