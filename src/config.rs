//! Controller configuration parameters
//!
//! All tunable parameters for the chassis controller.  The core never reads
//! files or the environment; a [`ConfigPort`](crate::app::ports::ConfigPort)
//! adapter loads this struct and hands it over at construction.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::safety::PwmLimits;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Actuators ---
    /// Pulse window for the drive motor ESC.
    pub motor_limits: PwmLimits,
    /// Pulse window for the steering servo (narrower than the motor's).
    pub steering_limits: PwmLimits,

    // --- Self-test ---
    /// How long each self-test step is held (milliseconds).
    pub selftest_hold_ms: u32,

    // --- Console ---
    /// Echo every received line back before answering it.
    pub echo_input: bool,
}

impl ControllerConfig {
    /// Shortest accepted self-test hold.
    pub const MIN_HOLD_MS: u32 = 100;
    /// Longest accepted self-test hold.
    pub const MAX_HOLD_MS: u32 = 60_000;

    pub fn selftest_hold(&self) -> Duration {
        Duration::from_millis(u64::from(self.selftest_hold_ms))
    }

    /// Reject values that would make the hardware unsafe.  Values are never
    /// silently clamped here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motor_limits.validate()?;
        self.steering_limits.validate()?;
        if !(Self::MIN_HOLD_MS..=Self::MAX_HOLD_MS).contains(&self.selftest_hold_ms) {
            return Err(ConfigError::ValidationFailed(
                "selftest_hold_ms must be within 100..=60000",
            ));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            motor_limits: PwmLimits::FULL,
            steering_limits: PwmLimits::STEERING,
            selftest_hold_ms: 2000,
            echo_input: true,
        }
    }
}
