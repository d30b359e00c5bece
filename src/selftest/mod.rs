//! Self-test sequencer.
//!
//! Walks the static [`script::STEPS`] table, holding each setpoint for a
//! configured duration.  Time is never read here: every call receives
//! `now` from the caller's [`Clock`](crate::app::ports::Clock), so the
//! whole sweep can be driven in tests with hand-made instants.
//!
//! ```text
//!            start(now)                    hold elapsed, last step
//!   ┌──────┐ ─────────▶ ┌──────────────┐ ───────────────────────▶ ┌──────┐
//!   │ Idle │            │ Running(i)   │    (set_neutral)         │ Idle │
//!   └──────┘ ◀───────── └──────────────┘                          └──────┘
//!            abort()      │  ▲ hold elapsed:
//!           (set_neutral) └──┘ enter i+1
//! ```
//!
//! At most one step is entered per [`poll`](SelfTestSequencer::poll), so a
//! long stall between polls never skips a step.

pub mod script;

use embassy_time::{Duration, Instant};
use log::info;

use crate::actuation::{ActuationState, Setpoint};
use crate::app::ports::{ActuatorId, PwmSink};
use script::{Step, Target, STEPS};

/// Where the sequencer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    /// Holding step `step` (0-based), entered at `since`.
    Running { step: usize, since: Instant },
}

/// Result of one [`SelfTestSequencer::poll`] or
/// [`SelfTestSequencer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing is running.
    Idle,
    /// The current step's hold has not elapsed yet.
    Holding,
    /// Step `index` (0-based) was just entered and applied.
    Entered {
        index: usize,
        step: &'static Step,
        actuator: ActuatorId,
        setpoint: Setpoint,
    },
    /// The last step elapsed; both actuators are neutral again.
    Finished,
}

pub struct SelfTestSequencer {
    state: SequencerState,
    hold: Duration,
}

impl SelfTestSequencer {
    pub fn new(hold: Duration) -> Self {
        Self {
            state: SequencerState::Idle,
            hold,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SequencerState::Running { .. })
    }

    /// Number of steps in the sweep.
    pub fn total_steps(&self) -> usize {
        STEPS.len()
    }

    /// Begin the sweep, applying step 0 immediately.  A no-op returning
    /// [`Progress::Holding`] if a sweep is already running.
    pub fn start<P: PwmSink>(&mut self, now: Instant, act: &mut ActuationState<P>) -> Progress {
        if self.is_running() {
            return Progress::Holding;
        }
        info!("self-test: start ({} steps)", STEPS.len());
        self.enter(0, now, act)
    }

    /// Advance if the current hold has elapsed.
    pub fn poll<P: PwmSink>(&mut self, now: Instant, act: &mut ActuationState<P>) -> Progress {
        let SequencerState::Running { step, since } = self.state else {
            return Progress::Idle;
        };
        let elapsed = now.checked_duration_since(since);
        if elapsed.is_none_or(|d| d < self.hold) {
            return Progress::Holding;
        }

        let next = step + 1;
        if next < STEPS.len() {
            return self.enter(next, now, act);
        }

        act.set_neutral();
        self.state = SequencerState::Idle;
        info!("self-test: done");
        Progress::Finished
    }

    /// Stop wherever the sweep is and force neutral.  Returns the step that
    /// was interrupted, if any.  Safe to call when idle.
    pub fn abort<P: PwmSink>(&mut self, act: &mut ActuationState<P>) -> Option<usize> {
        let interrupted = match self.state {
            SequencerState::Running { step, .. } => Some(step),
            SequencerState::Idle => None,
        };
        act.set_neutral();
        self.state = SequencerState::Idle;
        if let Some(step) = interrupted {
            info!("self-test: aborted at step {}", step + 1);
        }
        interrupted
    }

    fn enter<P: PwmSink>(
        &mut self,
        index: usize,
        now: Instant,
        act: &mut ActuationState<P>,
    ) -> Progress {
        let step = &STEPS[index];
        let (actuator, setpoint) = match step.target {
            Target::Steering(v) => (ActuatorId::Steering, act.set_steering(v)),
            Target::Speed(v) => (ActuatorId::Motor, act.set_speed(v)),
        };
        self.state = SequencerState::Running { step: index, since: now };
        info!(
            "self-test: [{}/{}] {} ({})",
            index + 1,
            STEPS.len(),
            step.label,
            setpoint.pulse
        );
        Progress::Entered {
            index,
            step,
            actuator,
            setpoint,
        }
    }
}
