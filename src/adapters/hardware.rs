//! Hardware adapter: bridges PWM peripherals to the [`PwmSink`] port.
//!
//! [`ServoPwm`] drives two `embedded_hal` PWM channels configured for
//! [`SERVO_PWM_FREQ_HZ`](crate::pins::SERVO_PWM_FREQ_HZ).  A pulse width
//! becomes a duty fraction of the 20 ms frame, so the adapter works with
//! any HAL whatever its duty resolution.
//!
//! [`SimulatedChannel`] is an in-memory channel for host runs and tests.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::{debug, error};

use crate::app::ports::{ActuatorId, PwmSink};
use crate::error::ActuatorError;
use crate::mapping::PulseWidth;
use crate::pins;

/// Motor ESC and steering servo behind one [`PwmSink`].
pub struct ServoPwm<M, S> {
    motor: M,
    steering: S,
}

impl<M: SetDutyCycle, S: SetDutyCycle> ServoPwm<M, S> {
    pub fn new(motor: M, steering: S) -> Self {
        Self { motor, steering }
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn steering(&self) -> &S {
        &self.steering
    }
}

fn write_pulse<C: SetDutyCycle>(ch: &mut C, pulse: PulseWidth) -> Result<(), ActuatorError> {
    ch.set_duty_cycle_fraction(pulse.as_micros(), pins::SERVO_PERIOD_US)
        .map_err(|e| {
            error!("PWM write failed: {:?}", e);
            ActuatorError::PwmWriteFailed
        })
}

impl<M: SetDutyCycle, S: SetDutyCycle> PwmSink for ServoPwm<M, S> {
    fn write_pwm(&mut self, actuator: ActuatorId, pulse: PulseWidth) -> Result<(), ActuatorError> {
        match actuator {
            ActuatorId::Motor => write_pulse(&mut self.motor, pulse),
            ActuatorId::Steering => write_pulse(&mut self.steering, pulse),
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

/// 16-bit duty resolution, like a typical timer-based PWM peripheral.
const SIM_MAX_DUTY: u16 = u16::MAX;

/// A PWM channel that only remembers its duty.
#[derive(Debug)]
pub struct SimulatedChannel {
    gpio: i32,
    duty: u16,
}

impl SimulatedChannel {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, duty: 0 }
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// High time of the current duty, in microseconds.
    pub fn pulse_us(&self) -> u16 {
        let us = u32::from(self.duty) * u32::from(pins::SERVO_PERIOD_US) / u32::from(SIM_MAX_DUTY);
        us as u16
    }
}

impl ErrorType for SimulatedChannel {
    type Error = Infallible;
}

impl SetDutyCycle for SimulatedChannel {
    fn max_duty_cycle(&self) -> u16 {
        SIM_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        debug!("GPIO{} duty={} (~{}us)", self.gpio, duty, self.pulse_us());
        Ok(())
    }
}

/// The host's servo outputs, on the board's pin numbers.
pub fn simulated_servos() -> ServoPwm<SimulatedChannel, SimulatedChannel> {
    ServoPwm::new(
        SimulatedChannel::new(pins::MOTOR_PWM_GPIO),
        SimulatedChannel::new(pins::STEERING_PWM_GPIO),
    )
}
