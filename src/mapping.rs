//! Normalized control value → PWM pulse width.
//!
//! Operators speak in signed percentages; the motor controller and the
//! steering servo speak in pulse widths.  The map is affine and anchored at
//! the universal neutral point:
//!
//! ```text
//!   -100 ─────────── 0 ─────────── +100      Normalized
//!     │              │               │
//!   1000 µs ──── 1500 µs ──────── 2000 µs    PulseWidth
//! ```
//!
//! Everything here is pure and total: out-of-domain input is clamped, not
//! rejected.  Rejection of operator mistakes happens earlier, in the parser.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Normalized value
// ---------------------------------------------------------------------------

/// Signed percentage in `[-100, 100]`.  Negative is reverse / left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Normalized(i8);

impl Normalized {
    pub const MIN: i32 = -100;
    pub const MAX: i32 = 100;
    pub const ZERO: Self = Self(0);

    /// Accept `value` only if it lies inside the domain.
    pub fn new(value: i32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value as i8))
    }

    /// Clamp `value` into the domain.
    pub fn saturating(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX) as i8)
    }

    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Normalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Pulse width
// ---------------------------------------------------------------------------

/// Servo / ESC pulse width in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PulseWidth(u16);

impl PulseWidth {
    /// Shortest pulse any actuator on this chassis accepts.
    pub const MIN: Self = Self(1000);
    /// Zero speed / centred steering.
    pub const NEUTRAL: Self = Self(1500);
    /// Longest pulse any actuator on this chassis accepts.
    pub const MAX: Self = Self(2000);

    /// Build a pulse width, clamped into `[MIN, MAX]`.
    pub const fn from_micros(us: u16) -> Self {
        if us < Self::MIN.0 {
            Self::MIN
        } else if us > Self::MAX.0 {
            Self::MAX
        } else {
            Self(us)
        }
    }

    pub const fn as_micros(self) -> u16 {
        self.0
    }
}

impl Default for PulseWidth {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for PulseWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Affine map of `x` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`,
/// rounded to the nearest integer (halves away from zero).
///
/// `x` is clamped to the input interval first.  A zero-width input
/// interval maps everything to `out_lo`.
pub fn map_range(x: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    if in_lo == in_hi {
        return out_lo;
    }
    let (lo, hi) = if in_lo <= in_hi { (in_lo, in_hi) } else { (in_hi, in_lo) };
    let x = i64::from(x.clamp(lo, hi));

    let num = (x - i64::from(in_lo)) * (i64::from(out_hi) - i64::from(out_lo));
    let den = i64::from(in_hi) - i64::from(in_lo);
    i64::from(out_lo)
        .saturating_add(div_round(num, den))
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn div_round(num: i64, den: i64) -> i64 {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num >= 0 {
        (num + den / 2) / den
    } else {
        (num - den / 2) / den
    }
}

/// Map a normalized value onto the full `[1000, 2000]` µs band.
///
/// Accepts any `i32`; values outside `[-100, 100]` map exactly like the
/// nearest bound.
pub fn to_pwm(value: i32) -> PulseWidth {
    let us = map_range(
        value,
        Normalized::MIN,
        Normalized::MAX,
        i32::from(PulseWidth::MIN.as_micros()),
        i32::from(PulseWidth::MAX.as_micros()),
    );
    PulseWidth::from_micros(us as u16)
}
