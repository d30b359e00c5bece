//! Port traits: the hexagonal boundary between the controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (serial link, PWM outputs, rangefinders, clock, event
//! sinks, config storage) implement these traits.  The
//! [`Controller`](super::service::Controller) consumes them via generics, so
//! the domain core never touches hardware directly.
//!
//! ## Safety notes
//!
//! - **PwmSink** receives pulses that are already clamped to the actuator's
//!   limits.  Implementations must not rescale them.
//! - **ConfigPort** implementations MUST validate before handing a config
//!   to the controller.

use embassy_time::Instant;

use crate::config::ControllerConfig;
use crate::error::{ActuatorError, SensorError};
use crate::mapping::PulseWidth;

// ───────────────────────────────────────────────────────────────
// Line transport (driven adapter: serial link ↔ domain)
// ───────────────────────────────────────────────────────────────

/// A framed, line-oriented operator link.
///
/// Framing (byte buffering, `\n` detection) is the adapter's job; the
/// controller only ever sees complete lines.
pub trait LineTransport {
    /// Whether a complete line is ready to be read without blocking.
    fn has_line(&mut self) -> bool;

    /// Take the next complete line, without its terminator.
    fn read_line(&mut self) -> Option<String>;

    /// Send one line of text.  The adapter appends the terminator.
    fn write_line(&mut self, line: &str);

    /// Drop buffered input and return the link to its power-on state.
    fn reinitialize(&mut self);

    /// Whether the far end has gone away for good.  A UART never closes.
    fn is_closed(&self) -> bool {
        false
    }
}

// ───────────────────────────────────────────────────────────────
// PWM sink (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two PWM outputs of the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorId {
    /// Drive motor ESC.
    Motor,
    /// Steering servo.
    Steering,
}

impl ActuatorId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Motor => "motor",
            Self::Steering => "steering",
        }
    }
}

/// Write-side port: the domain calls this to move a pulse width onto a pin.
pub trait PwmSink {
    fn write_pwm(&mut self, actuator: ActuatorId, pulse: PulseWidth) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Distance sensors (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Most rangefinders a chassis carries.
pub const MAX_RANGEFINDERS: usize = 8;

/// Rangefinder label, e.g. `"front-left"`.
pub type SensorName = heapless::String<24>;

/// One named distance measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReading {
    pub name: SensorName,
    pub centimeters: f32,
}

/// All readings from one poll, in mounting order.
pub type DistanceReadings = heapless::Vec<DistanceReading, MAX_RANGEFINDERS>;

/// Read-side port for the ultrasonic rangefinders.
pub trait DistancePort {
    fn distances_cm(&mut self) -> Result<DistanceReadings, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: monotonic time → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Injected so self-test holds can be tested
/// without real time passing.
pub trait Clock {
    fn now(&self) -> Instant;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControlEvent`](super::events::ControlEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControlEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: storage → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the controller configuration.
///
/// Implementations MUST run [`ControllerConfig::validate`] and reject
/// invalid values with [`ConfigError::ValidationFailed`], not clamp them.
pub trait ConfigPort {
    fn load(&self) -> Result<ControllerConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config source exists.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
