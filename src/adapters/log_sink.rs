//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events to the `log`
//! facade, one structured line per event.  A telemetry adapter would
//! implement the same trait.

use log::{info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControlEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Started => info!("START | actuators neutral"),
            ControlEvent::SetpointApplied { actuator, setpoint } => {
                info!(
                    "PWM   | {}={} value={}",
                    actuator.name(),
                    setpoint.pulse,
                    setpoint.value
                );
            }
            ControlEvent::Neutral => info!("PWM   | neutral"),
            ControlEvent::SelfTestStarted { steps } => info!("TEST  | start, {} steps", steps),
            ControlEvent::SelfTestStep {
                index,
                total,
                label,
            } => info!("TEST  | step {}/{} {}", index, total, label),
            ControlEvent::SelfTestFinished => info!("TEST  | done"),
            ControlEvent::SelfTestAborted { at_step } => {
                info!("TEST  | aborted at step {}", at_step);
            }
            ControlEvent::CommandRejected { command, reason } => {
                warn!("CMD   | {} rejected: {}", command, reason.as_str());
            }
            ControlEvent::ResetRequested => info!("RESET | requested"),
            ControlEvent::Fault(e) => warn!("FAULT | {}", e),
        }
    }
}
