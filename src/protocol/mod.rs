//! Serial command-line protocol.
//!
//! Two dialects share one wire: the canonical **delimited** form and the
//! older **letter-coded** form, which is kept as a translation layer in
//! front of the same [`Command`] union.
//!
//! ```text
//!   "50;-30;"   ──▶ delimited::parse ──┐
//!   "mf 40"     ──▶ letter::translate ─┼──▶ Command
//!   "help" ...  ──▶ keyword match ─────┘
//! ```
//!
//! | Input                    | Command                          |
//! |--------------------------|----------------------------------|
//! | `<int>;<int>;`           | `Drive { speed, steering }`      |
//! | `mf <0-100>` `mr <0-100>`| `SetMotor(±level)`               |
//! | `ms`                     | `SetMotor(0)`                    |
//! | `sl <0-100>` `sr <0-100>`| `SetSteering(∓level)`            |
//! | `help` `reset` `selftest` `distance` | keyword commands     |
//! | blank                    | `Empty`                          |
//! | anything else            | `Unknown(raw)`                   |
//!
//! Parsing is total: malformed input becomes [`Command::Invalid`] or
//! [`Command::Unknown`], never a panic.

pub mod delimited;
pub mod letter;

use core::fmt;

use crate::app::commands::{raw_line, Command};

/// Which letter-coded command class a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    Motor,
    Steering,
}

impl CommandClass {
    pub fn letter(self) -> char {
        match self {
            Self::Motor => 'm',
            Self::Steering => 's',
        }
    }
}

/// Why a line in a recognised dialect was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Wrong number of `;`-terminated fields, or a field is not an integer.
    InvalidFormat,
    /// A value lies outside `[lo, hi]`.
    OutOfRange { lo: i16, hi: i16 },
    /// Letter command without a direction character.
    MissingDirection(CommandClass),
    /// Direction character not valid for the class.
    BadDirection(CommandClass, char),
    /// Trailing level token is not a number.
    BadLevel(CommandClass),
    /// Forward/reverse with level 0.
    PowerNotSet,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid format, use <speed>;<turn>;"),
            Self::OutOfRange { lo, hi } => {
                write!(f, "out of range, use values between {lo} and {hi}")
            }
            Self::MissingDirection(c) => write!(f, "command '{}': missing direction", c.letter()),
            Self::BadDirection(c, d) => {
                write!(f, "command '{}': unknown direction '{d}'", c.letter())
            }
            Self::BadLevel(c) => write!(f, "command '{}': level is not a number", c.letter()),
            Self::PowerNotSet => write!(f, "command 'm': power level not set"),
        }
    }
}

/// Parse one received line.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "help" => Command::Help,
        "reset" => Command::Reset,
        "selftest" => Command::SelfTest,
        "distance" => Command::Distance,
        _ if letter::is_letter_coded(line) => {
            letter::translate(line).unwrap_or_else(Command::Invalid)
        }
        _ if delimited::is_delimited(line) => delimited::parse(line).unwrap_or_else(Command::Invalid),
        _ => Command::Unknown(raw_line(line)),
    }
}
