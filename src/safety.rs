//! Pulse-width safety envelope.
//!
//! Every pulse that reaches a [`PwmSink`](crate::app::ports::PwmSink) has
//! passed through [`PwmLimits::clamp`] for its actuator.  This is the last
//! line of defence between a bad setpoint and the hardware:
//!
//! 1. The parser rejects out-of-range operator input.
//! 2. [`to_pwm`](crate::mapping::to_pwm) clamps to the `[1000, 2000]` µs band.
//! 3. `PwmLimits` clamps again to the actuator's own, possibly narrower,
//!    window (the steering linkage binds well before 1000/2000 µs).
//!
//! Clamping is silent towards the operator; it is only logged at debug
//! level.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::mapping::PulseWidth;

/// Inclusive pulse-width window for one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmLimits {
    /// Shortest pulse ever written (full reverse / full left).
    pub min_us: u16,
    /// Longest pulse ever written (full forward / full right).
    pub max_us: u16,
}

impl PwmLimits {
    /// The whole band: ESCs accept every pulse the mapper can produce.
    pub const FULL: Self = Self {
        min_us: PulseWidth::MIN.as_micros(),
        max_us: PulseWidth::MAX.as_micros(),
    };

    /// Steering default.  ±400 µs around neutral keeps the linkage clear of
    /// its mechanical stops.
    pub const STEERING: Self = Self {
        min_us: 1100,
        max_us: 1900,
    };

    /// Clamp `pulse` into this window.  An inverted window collapses onto
    /// `max_us` instead of panicking.
    pub fn clamp(&self, pulse: PulseWidth) -> PulseWidth {
        let us = pulse.as_micros();
        let clamped = us.max(self.min_us).min(self.max_us);
        if clamped != us {
            debug!("pulse {}us clamped to {}us", us, clamped);
        }
        PulseWidth::from_micros(clamped)
    }

    pub fn contains(&self, pulse: PulseWidth) -> bool {
        (self.min_us..=self.max_us).contains(&pulse.as_micros())
    }

    /// Reject windows that would allow unsafe pulses or exclude neutral.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let neutral = PulseWidth::NEUTRAL.as_micros();
        if self.min_us < PulseWidth::MIN.as_micros() {
            return Err(ConfigError::ValidationFailed("min_us below 1000"));
        }
        if self.max_us > PulseWidth::MAX.as_micros() {
            return Err(ConfigError::ValidationFailed("max_us above 2000"));
        }
        if self.min_us > self.max_us {
            return Err(ConfigError::ValidationFailed("min_us above max_us"));
        }
        if self.min_us > neutral || self.max_us < neutral {
            return Err(ConfigError::ValidationFailed(
                "limits must include the 1500us neutral point",
            ));
        }
        Ok(())
    }
}

impl Default for PwmLimits {
    fn default() -> Self {
        Self::FULL
    }
}
