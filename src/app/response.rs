//! Operator-facing responses.
//!
//! Every handled line produces exactly one [`Response`].  Its `Display`
//! is the text written back over the link, one or more lines;
//! [`Response::Empty`] renders as nothing and is not written at all.

use core::fmt;

use crate::actuation::Setpoint;
use crate::error::SensorError;
use crate::protocol::ParseError;

use super::commands::RawLine;
use super::ports::DistanceReadings;

pub const HELP_TEXT: &str = "\
Commands must end with character: '\\n'
  <speed>;<turn>;   drive, both values in -100..100   e.g. 50;-30;
  mf <0-100>        motor forward
  mr <0-100>        motor reverse
  ms                motor stop
  sl <0-100>        steer left
  sr <0-100>        steer right
  selftest          sweep steering then motor, then neutral
  distance          print rangefinder readings
  reset             abort, go neutral, restart the link
  help              this text";

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Blank input: nothing is written.
    Empty,
    Motor(Setpoint),
    Steering(Setpoint),
    Drive { speed: Setpoint, steering: Setpoint },
    Help,
    /// `reset` accepted.
    ResetAck,
    SelfTestStarted,
    /// Rejected because the self-test owns the actuators.
    Busy,
    Distances(DistanceReadings),
    SensorFault(SensorError),
    Unknown(RawLine),
    Invalid { input: RawLine, error: ParseError },

    // ── Unsolicited progress, produced by polling ──
    SelfTestStep {
        index: usize,
        total: usize,
        label: &'static str,
        /// Phase header written on its own line before the step.
        phase: Option<&'static str>,
    },
    SelfTestDone,
}

impl Response {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

fn speed(f: &mut fmt::Formatter<'_>, sp: &Setpoint) -> fmt::Result {
    write!(f, "Speed: {} ({})", sp.value, sp.pulse)
}

fn turn(f: &mut fmt::Formatter<'_>, sp: &Setpoint) -> fmt::Result {
    write!(f, "Turn: {} ({})", sp.value, sp.pulse)
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Motor(sp) => speed(f, sp),
            Self::Steering(sp) => turn(f, sp),
            Self::Drive {
                speed: s,
                steering: t,
            } => {
                speed(f, s)?;
                f.write_str(" | ")?;
                turn(f, t)
            }
            Self::Help => f.write_str(HELP_TEXT),
            Self::ResetAck => f.write_str("Ok."),
            Self::SelfTestStarted => f.write_str("Self-test started"),
            Self::Busy => f.write_str("Busy: self-test running, send 'reset' to abort"),
            Self::Distances(readings) if readings.is_empty() => {
                f.write_str("No distance sensors")
            }
            Self::Distances(readings) => {
                for (i, r) in readings.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}: {:.1} cm", r.name, r.centimeters)?;
                }
                Ok(())
            }
            Self::SensorFault(e) => write!(f, "Distance error: {e}"),
            Self::Unknown(raw) => write!(f, "Command '{raw}' is unknown; Maybe try 'help'?"),
            Self::Invalid { input, error } => write!(f, "Command '{input}' rejected: {error}"),
            Self::SelfTestStep {
                index,
                total,
                label,
                phase,
            } => {
                if let Some(phase) = phase {
                    writeln!(f, "{phase}")?;
                }
                write!(f, "[{index}/{total}] {label}")
            }
            Self::SelfTestDone => f.write_str("Self-test DONE"),
        }
    }
}
