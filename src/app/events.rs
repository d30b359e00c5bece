//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They carry no response
//! text; the operator link gets [`Response`](super::response::Response)s,
//! while events feed logs and telemetry.

use crate::actuation::Setpoint;
use crate::error::Error;

use super::ports::ActuatorId;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// The controller has written its power-on neutral and is ready.
    Started,

    /// A setpoint was applied to one actuator.
    SetpointApplied {
        actuator: ActuatorId,
        setpoint: Setpoint,
    },

    /// Both actuators were forced to neutral.
    Neutral,

    /// The self-test sweep began.
    SelfTestStarted { steps: usize },

    /// The sweep entered step `index` (1-based) of `total`.
    SelfTestStep {
        index: usize,
        total: usize,
        label: &'static str,
    },

    /// The sweep ran to completion.
    SelfTestFinished,

    /// The sweep was cut short by a reset.
    SelfTestAborted { at_step: usize },

    /// A line was answered with a diagnostic instead of being executed.
    CommandRejected {
        command: &'static str,
        reason: RejectReason,
    },

    /// `reset` was accepted; the loop is about to exit.
    ResetRequested,

    /// A collaborator failed.  The loop keeps running.
    Fault(Error),
}

/// Why a command was not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The self-test owns the actuators.
    Busy,
    /// Not a command in either dialect.
    Unknown,
    /// Recognised dialect, malformed content.
    Invalid,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::Unknown => "unknown",
            Self::Invalid => "invalid",
        }
    }
}
