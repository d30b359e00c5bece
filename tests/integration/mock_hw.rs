//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! a serial port, PWM peripheral or real time passing.

use std::cell::Cell;
use std::collections::VecDeque;

use embassy_time::{Duration, Instant};
use rc_chassis::app::events::ControlEvent;
use rc_chassis::app::ports::{
    ActuatorId, Clock, DistancePort, DistanceReading, DistanceReadings, EventSink, LineTransport,
    PwmSink,
};
use rc_chassis::error::{ActuatorError, SensorError};
use rc_chassis::mapping::PulseWidth;

// ── PWM ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPwm {
    pub writes: Vec<(ActuatorId, u16)>,
    pub fail_motor: bool,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pulse written to `id`, if any.
    pub fn last(&self, id: ActuatorId) -> Option<u16> {
        self.writes
            .iter()
            .rev()
            .find(|(a, _)| *a == id)
            .map(|(_, us)| *us)
    }

    pub fn writes_to(&self, id: ActuatorId) -> Vec<u16> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == id)
            .map(|(_, us)| *us)
            .collect()
    }
}

impl PwmSink for MockPwm {
    fn write_pwm(&mut self, actuator: ActuatorId, pulse: PulseWidth) -> Result<(), ActuatorError> {
        if self.fail_motor && actuator == ActuatorId::Motor {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.writes.push((actuator, pulse.as_micros()));
        Ok(())
    }
}

// ── Link ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLink {
    pub input: VecDeque<String>,
    pub output: Vec<String>,
    pub reinitialized: usize,
    pub closed: bool,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, line: &str) {
        self.input.push_back(line.to_owned());
    }

    /// Output lines written since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

impl LineTransport for MockLink {
    fn has_line(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_owned());
    }

    fn reinitialize(&mut self) {
        self.input.clear();
        self.reinitialized += 1;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced clock.
#[derive(Default)]
pub struct MockClock {
    ms: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.ms.set(self.ms.get() + d.as_millis());
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.ms.get())
    }
}

// ── Rangefinders ──────────────────────────────────────────────

pub struct MockSensors {
    pub result: Result<DistanceReadings, SensorError>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn failing(e: SensorError) -> Self {
        Self {
            result: Err(e),
            reads: 0,
        }
    }

    pub fn with(readings: &[(&str, f32)]) -> Self {
        let mut out = DistanceReadings::new();
        for (name, cm) in readings {
            out.push(DistanceReading {
                name: (*name).try_into().unwrap(),
                centimeters: *cm,
            })
            .unwrap();
        }
        Self {
            result: Ok(out),
            reads: 0,
        }
    }
}

impl DistancePort for MockSensors {
    fn distances_cm(&mut self) -> Result<DistanceReadings, SensorError> {
        self.reads += 1;
        self.result.clone()
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ControlEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, e: &ControlEvent) -> bool {
        self.events.contains(e)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}
