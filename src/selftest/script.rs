//! The actuator sweep, as data.
//!
//! Steering runs first (left → right → centre), then the motor (forward
//! ramp → neutral → reverse ramp → neutral).  Every step is held for the
//! configured hold before the next one is entered.  The first step of each
//! phase carries the phase header shown to the operator.

/// What one step commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Steering(i32),
    Speed(i32),
}

/// One row of the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub label: &'static str,
    pub target: Target,
    /// Header printed before this step, if it opens a phase.
    pub phase: Option<&'static str>,
}

impl Step {
    const fn opens(self, phase: &'static str) -> Self {
        Self {
            phase: Some(phase),
            ..self
        }
    }
}

const fn steer(label: &'static str, value: i32) -> Step {
    Step {
        label,
        target: Target::Steering(value),
        phase: None,
    }
}

const fn speed(label: &'static str, value: i32) -> Step {
    Step {
        label,
        target: Target::Speed(value),
        phase: None,
    }
}

pub static STEPS: [Step; 15] = [
    steer("Max left", -100).opens("Testing steering"),
    steer("Half left", -50),
    steer("Steering neutral", 0),
    steer("Half right", 50),
    steer("Max right", 100),
    steer("Steering neutral", 0),
    speed("Motor neutral", 0).opens("Testing motors"),
    speed("20 % speed", 20),
    speed("50 % speed", 50),
    speed("100 % speed", 100),
    speed("Motor neutral", 0),
    speed("-20 % speed", -20),
    speed("-50 % speed", -50),
    speed("-100 % speed", -100),
    speed("Motor neutral", 0),
];
