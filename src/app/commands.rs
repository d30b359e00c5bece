//! Inbound commands to the controller.
//!
//! One [`Command`] is produced by [`protocol::parse`](crate::protocol::parse)
//! for every received line and consumed once by
//! [`Controller`](super::service::Controller).  Nothing retains it.

use crate::mapping::Normalized;
use crate::protocol::ParseError;

/// Longest line the protocol carries, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64;

/// Raw operator text kept for diagnostics (truncated to [`MAX_LINE_LEN`]).
pub type RawLine = heapless::String<MAX_LINE_LEN>;

/// Copy `s` into a [`RawLine`], dropping whatever does not fit.
pub fn raw_line(s: &str) -> RawLine {
    let mut out = RawLine::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Drive-motor direction in the letter-coded dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorDirection {
    Forward,
    Reverse,
    Stop,
}

/// Steering direction in the letter-coded dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringDirection {
    Left,
    Right,
}

/// Commands the serial dialects translate into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the drive motor only.
    SetMotor(Normalized),
    /// Set the steering servo only.
    SetSteering(Normalized),
    /// Set both at once (`<speed>;<turn>;`).
    Drive {
        speed: Normalized,
        steering: Normalized,
    },
    /// Abort everything, go neutral, reinitialize the link.
    Reset,
    /// Run the scripted actuator sweep.
    SelfTest,
    /// Print the command reference.
    Help,
    /// Report rangefinder readings.
    Distance,
    /// Blank line.
    Empty,
    /// Not a command in either dialect.
    Unknown(RawLine),
    /// Recognised dialect, malformed content.
    Invalid(ParseError),
}

impl Command {
    /// Short name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetMotor(_) => "motor",
            Self::SetSteering(_) => "steering",
            Self::Drive { .. } => "drive",
            Self::Reset => "reset",
            Self::SelfTest => "selftest",
            Self::Help => "help",
            Self::Distance => "distance",
            Self::Empty => "empty",
            Self::Unknown(_) => "unknown",
            Self::Invalid(_) => "invalid",
        }
    }

    /// Whether the command may run while the self-test owns the actuators.
    pub fn preempts_selftest(&self) -> bool {
        matches!(self, Self::Reset | Self::Empty)
    }
}
