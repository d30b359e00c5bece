//! Canonical dialect: `<speed>;<turn>;`
//!
//! Exactly two integer fields, each terminated by `;`.  Whitespace around
//! a field is tolerated.  Both values must lie in `[-100, 100]`; nothing is
//! clamped at this boundary so that operator mistakes surface.

use super::ParseError;
use crate::app::commands::Command;
use crate::mapping::Normalized;

const FIELD_COUNT: usize = 2;

const RANGE: ParseError = ParseError::OutOfRange {
    lo: Normalized::MIN as i16,
    hi: Normalized::MAX as i16,
};

/// Lines routed to this dialect: they contain `;` or open with a number.
pub fn is_delimited(line: &str) -> bool {
    line.contains(';')
        || line
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+')
}

/// Parse a trimmed line into [`Command::Drive`].
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let body = line.strip_suffix(';').ok_or(ParseError::InvalidFormat)?;

    let mut values = [0i64; FIELD_COUNT];
    let mut count = 0;
    for field in body.split(';') {
        if count == FIELD_COUNT {
            return Err(ParseError::InvalidFormat);
        }
        values[count] = field
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidFormat)?;
        count += 1;
    }
    if count != FIELD_COUNT {
        return Err(ParseError::InvalidFormat);
    }

    let [speed, turn] = values;
    let speed = to_normalized(speed)?;
    let steering = to_normalized(turn)?;
    Ok(Command::Drive { speed, steering })
}

fn to_normalized(v: i64) -> Result<Normalized, ParseError> {
    i32::try_from(v)
        .ok()
        .and_then(Normalized::new)
        .ok_or(RANGE)
}
