//! Actuation state: the only place pulses are written.
//!
//! Holds the current speed and steering setpoints in both representations
//! (normalized and pulse width) and owns the injected [`PwmSink`].
//!
//! ## Safety contract
//!
//! - Every write goes value → [`to_pwm`] → [`PwmLimits::clamp`] → sink.
//! - Limits are validated once, in [`ActuationState::new`]; a window that
//!   is inverted or excludes 1500 µs is refused there.
//! - [`ActuationState::set_neutral`] is infallible and always writes both
//!   outputs, so it can be called from any error path.
//! - A failed sink write is logged and latched for the caller to report;
//!   it never aborts the control loop.

use log::{info, warn};

use crate::app::ports::{ActuatorId, ConfigError, PwmSink};
use crate::error::ActuatorError;
use crate::mapping::{to_pwm, Normalized, PulseWidth};
use crate::safety::PwmLimits;

/// A setpoint in both representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setpoint {
    pub value: Normalized,
    pub pulse: PulseWidth,
}

impl Setpoint {
    pub const NEUTRAL: Self = Self {
        value: Normalized::ZERO,
        pulse: PulseWidth::NEUTRAL,
    };
}

/// Per-actuator bookkeeping.
struct Channel {
    id: ActuatorId,
    limits: PwmLimits,
    setpoint: Setpoint,
    /// Last pulse the sink accepted.  `None` until the first write.
    written: Option<PulseWidth>,
}

impl Channel {
    fn new(id: ActuatorId, limits: PwmLimits) -> Self {
        Self {
            id,
            limits,
            setpoint: Setpoint::NEUTRAL,
            written: None,
        }
    }

    fn setpoint_for(&self, value: Normalized) -> Setpoint {
        Setpoint {
            value,
            pulse: self.limits.clamp(to_pwm(value.get())),
        }
    }
}

/// Speed and steering setpoints plus the hardware sink they drive.
pub struct ActuationState<P: PwmSink> {
    sink: P,
    motor: Channel,
    steering: Channel,
    fault: Option<ActuatorError>,
}

impl<P: PwmSink> ActuationState<P> {
    /// Wrap `sink`.  State starts neutral; nothing is written until the
    /// first setpoint or [`set_neutral`](Self::set_neutral).
    ///
    /// Fails if either window does not pass [`PwmLimits::validate`].
    pub fn new(
        sink: P,
        motor_limits: PwmLimits,
        steering_limits: PwmLimits,
    ) -> Result<Self, ConfigError> {
        motor_limits.validate()?;
        steering_limits.validate()?;
        Ok(Self {
            sink,
            motor: Channel::new(ActuatorId::Motor, motor_limits),
            steering: Channel::new(ActuatorId::Steering, steering_limits),
            fault: None,
        })
    }

    // ── Mutators ──────────────────────────────────────────────

    /// Command the drive motor.  Values outside `[-100, 100]` are clamped.
    /// No write happens if the resulting pulse is already on the pin.
    pub fn set_speed(&mut self, value: i32) -> Setpoint {
        let sp = self.motor.setpoint_for(Normalized::saturating(value));
        Self::apply(&mut self.sink, &mut self.motor, sp, false, &mut self.fault);
        sp
    }

    /// Command the steering servo.  The pulse never leaves the steering
    /// limits, whatever the value.
    pub fn set_steering(&mut self, value: i32) -> Setpoint {
        let sp = self.steering.setpoint_for(Normalized::saturating(value));
        Self::apply(&mut self.sink, &mut self.steering, sp, false, &mut self.fault);
        sp
    }

    /// Both outputs to 0 / 1500 µs, written unconditionally.
    pub fn set_neutral(&mut self) {
        let motor = self.motor.setpoint_for(Normalized::ZERO);
        Self::apply(&mut self.sink, &mut self.motor, motor, true, &mut self.fault);
        let steering = self.steering.setpoint_for(Normalized::ZERO);
        Self::apply(
            &mut self.sink,
            &mut self.steering,
            steering,
            true,
            &mut self.fault,
        );
        info!("actuators neutral");
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn speed(&self) -> Setpoint {
        self.motor.setpoint
    }

    pub fn steering(&self) -> Setpoint {
        self.steering.setpoint
    }

    pub fn is_neutral(&self) -> bool {
        self.motor.setpoint == Setpoint::NEUTRAL && self.steering.setpoint == Setpoint::NEUTRAL
    }

    /// Take the most recent sink failure, if any, clearing it.
    pub fn take_fault(&mut self) -> Option<ActuatorError> {
        self.fault.take()
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn into_sink(self) -> P {
        self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(
        sink: &mut P,
        ch: &mut Channel,
        sp: Setpoint,
        force: bool,
        fault: &mut Option<ActuatorError>,
    ) {
        ch.setpoint = sp;
        if !force && ch.written == Some(sp.pulse) {
            return;
        }
        debug_assert!(ch.limits.contains(sp.pulse));
        match sink.write_pwm(ch.id, sp.pulse) {
            Ok(()) => ch.written = Some(sp.pulse),
            Err(e) => {
                warn!("{} write of {} failed: {}", ch.id.name(), sp.pulse, e);
                ch.written = None;
                *fault = Some(e);
            }
        }
    }
}
