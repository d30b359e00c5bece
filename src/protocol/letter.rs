//! Legacy letter-coded dialect, translated into [`Command`].
//!
//! ```text
//!   m<D> [level]     D: f=forward  r=reverse  s=stop
//!   s<D> [level]     D: l=left     r=right
//! ```
//!
//! The direction letter is case-insensitive (`mF 40` is fine).  The level
//! is the token after the last space, `0..=100`, and defaults to 0 when
//! absent.  Forward/reverse at level 0 is refused; stop ignores the level.

use super::{CommandClass, ParseError};
use crate::app::commands::{Command, MotorDirection, SteeringDirection};
use crate::mapping::Normalized;

const LEVEL_MAX: i64 = 100;

/// Lines routed to this dialect: they open with `m` or `s`.
pub fn is_letter_coded(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b'm' | b's'))
}

/// Translate a trimmed `m…`/`s…` line into a motor or steering command.
pub fn translate(line: &str) -> Result<Command, ParseError> {
    let mut chars = line.chars();
    let class = match chars.next() {
        Some('m') => CommandClass::Motor,
        Some('s') => CommandClass::Steering,
        _ => return Err(ParseError::InvalidFormat),
    };
    let dir = chars
        .next()
        .filter(|c| !c.is_whitespace())
        .ok_or(ParseError::MissingDirection(class))?
        .to_ascii_lowercase();

    match class {
        CommandClass::Motor => {
            let direction = motor_direction(dir)?;
            let level = level(line, class)?;
            motor_value(direction, level).map(Command::SetMotor)
        }
        CommandClass::Steering => {
            let direction = steering_direction(dir)?;
            let level = level(line, class)?;
            Ok(Command::SetSteering(steering_value(direction, level)))
        }
    }
}

fn motor_direction(c: char) -> Result<MotorDirection, ParseError> {
    match c {
        'f' => Ok(MotorDirection::Forward),
        'r' => Ok(MotorDirection::Reverse),
        's' => Ok(MotorDirection::Stop),
        other => Err(ParseError::BadDirection(CommandClass::Motor, other)),
    }
}

fn steering_direction(c: char) -> Result<SteeringDirection, ParseError> {
    match c {
        'l' => Ok(SteeringDirection::Left),
        'r' => Ok(SteeringDirection::Right),
        other => Err(ParseError::BadDirection(CommandClass::Steering, other)),
    }
}

/// Token after the last space, or 0 if the line has no space.
fn level(line: &str, class: CommandClass) -> Result<u8, ParseError> {
    let Some((_, token)) = line.rsplit_once(' ') else {
        return Ok(0);
    };
    let v: i64 = token.parse().map_err(|_| ParseError::BadLevel(class))?;
    if !(0..=LEVEL_MAX).contains(&v) {
        return Err(ParseError::OutOfRange {
            lo: 0,
            hi: LEVEL_MAX as i16,
        });
    }
    Ok(v as u8)
}

fn motor_value(direction: MotorDirection, level: u8) -> Result<Normalized, ParseError> {
    let level = i32::from(level);
    match direction {
        MotorDirection::Stop => Ok(Normalized::ZERO),
        _ if level == 0 => Err(ParseError::PowerNotSet),
        MotorDirection::Forward => Ok(Normalized::saturating(level)),
        MotorDirection::Reverse => Ok(Normalized::saturating(-level)),
    }
}

fn steering_value(direction: SteeringDirection, level: u8) -> Normalized {
    let level = i32::from(level);
    match direction {
        SteeringDirection::Left => Normalized::saturating(-level),
        SteeringDirection::Right => Normalized::saturating(level),
    }
}
