//! Monotonic clock adapter.
//!
//! Reads the `embassy-time` driver.  On the host the `std` driver of
//! `embassy-time` backs it; on a board, whatever time driver the HAL
//! links in.

use embassy_time::Instant;

use crate::app::ports::Clock;

/// [`Clock`] over the global `embassy-time` driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
