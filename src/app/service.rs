//! Command dispatcher, the hexagonal core.
//!
//! [`Controller`] owns the actuation state and the self-test sequencer.
//! Everything else (link, rangefinders, clock, event sink) is passed in
//! at call sites through the port traits, so the whole core runs against
//! mocks in tests.
//!
//! ```text
//!  LineTransport ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │        Controller        │
//!   DistancePort ──▶ │  parse · dispatch · test │ ──▶ PwmSink
//!          Clock ──▶ └──────────────────────────┘
//! ```
//!
//! One received line produces exactly one [`Response`].  The self-test is
//! advanced on every [`Controller::service`] pass, after any pending line
//! has been handled, so a `reset` is always seen within one pass.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use log::{info, warn};

use crate::actuation::{ActuationState, Setpoint};
use crate::config::ControllerConfig;
use crate::error::Error;
use crate::protocol;
use crate::selftest::{Progress, SelfTestSequencer, SequencerState};

use super::commands::{raw_line, Command};
use super::events::{ControlEvent, RejectReason};
use super::ports::{
    ActuatorId, Clock, ConfigError, DistancePort, EventSink, LineTransport, PwmSink,
};
use super::response::Response;

/// Why [`Controller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// `reset` was accepted.  The controller is neutral and idle; the
    /// caller decides whether to re-enter the loop.
    ResetRequested,
    /// The transport reported end of input.
    TransportClosed,
}

/// Outcome of one [`Controller::service`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Continue,
    Exit(LoopExit),
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<P: PwmSink> {
    actuation: ActuationState<P>,
    selftest: SelfTestSequencer,
    echo_input: bool,
    /// Progress line produced while handling `selftest`, flushed on the
    /// next poll so the command itself still gets a single response.
    pending: Option<Response>,
}

impl<P: PwmSink> Controller<P> {
    /// Build the controller around `sink`.  `config` is validated first.
    ///
    /// Does **not** write anything; call [`start`](Self::start) next.
    pub fn new(sink: P, config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            actuation: ActuationState::new(sink, config.motor_limits, config.steering_limits)?,
            selftest: SelfTestSequencer::new(config.selftest_hold()),
            echo_input: config.echo_input,
            pending: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Power-on: both actuators to neutral.
    pub fn start(&mut self, events: &mut impl EventSink) {
        self.actuation.set_neutral();
        self.report_fault(events);
        events.emit(&ControlEvent::Started);
        info!("controller started");
    }

    /// One cooperative pass: handle at most one line, then advance the
    /// self-test.  Never blocks.
    pub fn service(
        &mut self,
        transport: &mut impl LineTransport,
        sensors: &mut impl DistancePort,
        clock: &impl Clock,
        events: &mut impl EventSink,
    ) -> LoopStatus {
        let now = clock.now();

        if transport.has_line() {
            if let Some(line) = transport.read_line() {
                if self.echo_input && !line.trim().is_empty() {
                    transport.write_line(line.trim_end());
                }
                let response = self.handle_line(&line, now, sensors, events);
                write_response(transport, &response);
                if matches!(response, Response::ResetAck) {
                    transport.reinitialize();
                    return LoopStatus::Exit(LoopExit::ResetRequested);
                }
            }
        } else if transport.is_closed() {
            info!("transport closed");
            return LoopStatus::Exit(LoopExit::TransportClosed);
        }

        if let Some(progress) = self.poll(now, events) {
            write_response(transport, &progress);
        }
        LoopStatus::Continue
    }

    /// Call [`service`](Self::service) until it asks to exit, running
    /// `idle` between passes.
    pub fn run(
        &mut self,
        transport: &mut impl LineTransport,
        sensors: &mut impl DistancePort,
        clock: &impl Clock,
        events: &mut impl EventSink,
        mut idle: impl FnMut(),
    ) -> LoopExit {
        loop {
            if let LoopStatus::Exit(exit) = self.service(transport, sensors, clock, events) {
                return exit;
            }
            idle();
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Parse and execute one line, producing its single response.
    pub fn handle_line(
        &mut self,
        line: &str,
        now: Instant,
        sensors: &mut impl DistancePort,
        events: &mut impl EventSink,
    ) -> Response {
        let cmd = protocol::parse(line);

        if self.selftest.is_running() && !cmd.preempts_selftest() {
            warn!("'{}' refused: self-test running", cmd.name());
            events.emit(&ControlEvent::CommandRejected {
                command: cmd.name(),
                reason: RejectReason::Busy,
            });
            return Response::Busy;
        }

        match cmd {
            Command::SetMotor(v) => {
                let sp = self.actuation.set_speed(v.get());
                self.applied(ActuatorId::Motor, sp, events);
                Response::Motor(sp)
            }
            Command::SetSteering(v) => {
                let sp = self.actuation.set_steering(v.get());
                self.applied(ActuatorId::Steering, sp, events);
                Response::Steering(sp)
            }
            Command::Drive { speed, steering } => {
                let speed = self.actuation.set_speed(speed.get());
                self.applied(ActuatorId::Motor, speed, events);
                let steering = self.actuation.set_steering(steering.get());
                self.applied(ActuatorId::Steering, steering, events);
                Response::Drive { speed, steering }
            }
            Command::Reset => {
                if let Some(step) = self.selftest.abort(&mut self.actuation) {
                    events.emit(&ControlEvent::SelfTestAborted { at_step: step + 1 });
                }
                self.pending = None;
                self.report_fault(events);
                events.emit(&ControlEvent::Neutral);
                events.emit(&ControlEvent::ResetRequested);
                info!("reset requested");
                Response::ResetAck
            }
            Command::SelfTest => {
                let total = self.selftest.total_steps();
                events.emit(&ControlEvent::SelfTestStarted { steps: total });
                let progress = self.selftest.start(now, &mut self.actuation);
                self.pending = self.progress(progress, events);
                Response::SelfTestStarted
            }
            Command::Help => Response::Help,
            Command::Distance => match sensors.distances_cm() {
                Ok(readings) => Response::Distances(readings),
                Err(e) => {
                    warn!("distance read failed: {}", e);
                    events.emit(&ControlEvent::Fault(Error::Sensor(e)));
                    Response::SensorFault(e)
                }
            },
            Command::Empty => Response::Empty,
            Command::Unknown(raw) => {
                warn!("unknown command '{}'", raw);
                events.emit(&ControlEvent::CommandRejected {
                    command: "unknown",
                    reason: RejectReason::Unknown,
                });
                Response::Unknown(raw)
            }
            Command::Invalid(error) => {
                let input = raw_line(line.trim());
                warn!("'{}' rejected: {}", input, error);
                events.emit(&ControlEvent::CommandRejected {
                    command: "invalid",
                    reason: RejectReason::Invalid,
                });
                Response::Invalid { input, error }
            }
        }
    }

    /// Advance the self-test against `now`.  Returns an unsolicited
    /// progress line when a step is entered or the sweep finishes.
    pub fn poll(&mut self, now: Instant, events: &mut impl EventSink) -> Option<Response> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        let progress = self.selftest.poll(now, &mut self.actuation);
        self.progress(progress, events)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn speed(&self) -> Setpoint {
        self.actuation.speed()
    }

    pub fn steering(&self) -> Setpoint {
        self.actuation.steering()
    }

    pub fn selftest_state(&self) -> SequencerState {
        self.selftest.state()
    }

    pub fn is_neutral(&self) -> bool {
        self.actuation.is_neutral()
    }

    pub fn sink(&self) -> &P {
        self.actuation.sink()
    }

    pub fn sink_mut(&mut self) -> &mut P {
        self.actuation.sink_mut()
    }

    /// Tear down, handing the PWM sink back (e.g. to build a fresh
    /// controller after a reset).
    pub fn into_sink(self) -> P {
        self.actuation.into_sink()
    }

    // ── Internal ──────────────────────────────────────────────

    fn applied(&mut self, actuator: ActuatorId, setpoint: Setpoint, events: &mut impl EventSink) {
        events.emit(&ControlEvent::SetpointApplied { actuator, setpoint });
        self.report_fault(events);
    }

    fn progress(&mut self, progress: Progress, events: &mut impl EventSink) -> Option<Response> {
        let total = self.selftest.total_steps();
        match progress {
            Progress::Entered {
                index,
                step,
                actuator,
                setpoint,
            } => {
                self.applied(actuator, setpoint, events);
                events.emit(&ControlEvent::SelfTestStep {
                    index: index + 1,
                    total,
                    label: step.label,
                });
                Some(Response::SelfTestStep {
                    index: index + 1,
                    total,
                    label: step.label,
                    phase: step.phase,
                })
            }
            Progress::Finished => {
                self.report_fault(events);
                events.emit(&ControlEvent::Neutral);
                events.emit(&ControlEvent::SelfTestFinished);
                Some(Response::SelfTestDone)
            }
            Progress::Idle | Progress::Holding => None,
        }
    }

    fn report_fault(&mut self, events: &mut impl EventSink) {
        if let Some(e) = self.actuation.take_fault() {
            events.emit(&ControlEvent::Fault(Error::Actuator(e)));
        }
    }
}

fn write_response(transport: &mut impl LineTransport, response: &Response) {
    if response.is_empty() {
        return;
    }
    let text = response.to_string();
    for line in text.lines() {
        transport.write_line(line);
    }
}

// ───────────────────────────────────────────────────────────────
// SharedController
// ───────────────────────────────────────────────────────────────

/// A [`Controller`] reachable from more than one execution context.
///
/// Manual commands and sequencer advancement both take the same critical
/// section, so they never interleave inside an actuator update.
pub struct SharedController<P: PwmSink> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Controller<P>>>,
}

impl<P: PwmSink> SharedController<P> {
    pub const fn new(controller: Controller<P>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(controller)),
        }
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut Controller<P>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn handle_line(
        &self,
        line: &str,
        now: Instant,
        sensors: &mut impl DistancePort,
        events: &mut impl EventSink,
    ) -> Response {
        self.with(|c| c.handle_line(line, now, sensors, events))
    }

    pub fn poll(&self, now: Instant, events: &mut impl EventSink) -> Option<Response> {
        self.with(|c| c.poll(now, events))
    }

    pub fn into_inner(self) -> Controller<P> {
        self.inner.into_inner().into_inner()
    }
}
