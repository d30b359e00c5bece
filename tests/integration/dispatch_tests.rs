//! Integration tests for the line → parse → dispatch → PWM pipeline.
//!
//! Each test feeds operator lines through the mock link and checks both
//! what reached the PWM outputs and what was written back.

use rc_chassis::app::events::{ControlEvent, RejectReason};
use rc_chassis::app::ports::{ActuatorId, ConfigError};
use rc_chassis::app::service::{Controller, LoopExit, LoopStatus};
use rc_chassis::config::ControllerConfig;
use rc_chassis::error::{ActuatorError, Error, SensorError};
use rc_chassis::safety::PwmLimits;

use crate::mock_hw::{MockPwm, MockSensors};
use crate::rig::Rig;

// ── Drive commands ────────────────────────────────────────────

#[test]
fn delimited_line_drives_both_actuators() {
    let mut rig = Rig::new();
    let out = rig.send("50;-30;");

    assert_eq!(
        rig.pwm().writes,
        vec![(ActuatorId::Motor, 1750), (ActuatorId::Steering, 1350)]
    );
    assert_eq!(out, ["50;-30;", "Speed: 50 (1750us) | Turn: -30 (1350us)"]);
}

#[test]
fn out_of_range_value_writes_nothing() {
    let mut rig = Rig::new();
    let out = rig.send("200;0;");

    assert!(rig.pwm().writes.is_empty());
    assert_eq!(out.len(), 2);
    assert!(out[1].contains("200;0;"));
    assert!(out[1].contains("out of range"));
    assert!(rig.events.contains(&ControlEvent::CommandRejected {
        command: "invalid",
        reason: RejectReason::Invalid,
    }));
}

#[test]
fn wrong_field_count_is_invalid_format() {
    let mut rig = Rig::new();
    let out = rig.send("10;20");
    assert!(rig.pwm().writes.is_empty());
    assert!(out[1].contains("invalid format"));
}

#[test]
fn letter_dialect_reaches_the_same_outputs() {
    let mut rig = Rig::new();
    rig.send("mf 40");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1700));
    rig.send("mr 40");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1300));
    rig.send("ms");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1500));
    rig.send("sl 30");
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1350));
    rig.send("SR 30");
    // Upper-case class letter is not a command.
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1350));
    rig.send("sR 30");
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1650));
}

#[test]
fn motor_without_power_level_is_refused() {
    let mut rig = Rig::new();
    let out = rig.send("mf");
    assert!(rig.pwm().writes.is_empty());
    assert!(out[1].contains("power level not set"));
}

#[test]
fn repeated_setpoint_writes_once() {
    let mut rig = Rig::new();
    rig.send("mf 40");
    rig.send("mf 40");
    assert_eq!(rig.pwm().writes_to(ActuatorId::Motor), vec![1700]);
}

#[test]
fn steering_is_held_inside_its_window() {
    let mut rig = Rig::new();
    rig.send("0;100;");
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1900));
    rig.send("0;-100;");
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1100));
    // The motor still gets the full band.
    rig.send("-100;0;");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1000));
}

// ── Informational commands ────────────────────────────────────

#[test]
fn unknown_command_suggests_help() {
    let mut rig = Rig::new();
    let out = rig.send("fly");
    assert_eq!(out, ["fly", "Command 'fly' is unknown; Maybe try 'help'?"]);
}

#[test]
fn help_lists_commands() {
    let mut rig = Rig::new();
    let out = rig.send("help");
    assert!(out.len() > 5);
    assert!(out.iter().any(|l| l.contains("<speed>;<turn>;")));
    assert!(rig.pwm().writes.is_empty());
}

#[test]
fn distance_reports_each_sensor() {
    let mut rig = Rig::new();
    rig.sensors = MockSensors::with(&[("front", 42.0), ("rear", 118.5)]);
    let out = rig.send("distance");
    assert_eq!(out, ["distance", "front: 42.0 cm", "rear: 118.5 cm"]);
    assert_eq!(rig.sensors.reads, 1);
}

#[test]
fn distance_failure_is_reported_not_fatal() {
    let mut rig = Rig::new();
    rig.sensors = MockSensors::failing(SensorError::Timeout);
    let out = rig.send("distance");
    assert_eq!(out[1], "Distance error: echo timeout");
    assert!(rig
        .events
        .contains(&ControlEvent::Fault(Error::Sensor(SensorError::Timeout))));

    // Loop keeps serving.
    rig.send("mf 10");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1550));
}

#[test]
fn blank_line_produces_no_output() {
    let mut rig = Rig::new();
    assert!(rig.send("").is_empty());
    assert!(rig.send("  \r").is_empty());
}

// ── Echo ──────────────────────────────────────────────────────

#[test]
fn echo_can_be_disabled() {
    let mut rig = Rig::with_config(ControllerConfig {
        echo_input: false,
        ..ControllerConfig::default()
    });
    assert_eq!(rig.send("ms"), ["Speed: 0 (1500us)"]);
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn reset_goes_neutral_acks_and_exits() {
    let mut rig = Rig::new();
    rig.send("80;40;");
    rig.link.send("reset");
    rig.link.send("mf 50");

    let status = rig.service();
    assert_eq!(status, LoopStatus::Exit(LoopExit::ResetRequested));
    assert_eq!(rig.link.take_output(), ["reset", "Ok."]);
    assert_eq!(rig.link.reinitialized, 1);
    // Input queued behind the reset is dropped with the link state.
    assert!(rig.link.input.is_empty());
    assert!(rig.ctl.is_neutral());
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1500));
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1500));
    assert!(rig.events.contains(&ControlEvent::ResetRequested));
}

#[test]
fn controller_keeps_working_after_reset() {
    let mut rig = Rig::new();
    rig.send("reset");
    rig.send("mf 50");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1750));
}

#[test]
fn run_returns_on_reset() {
    let mut rig = Rig::new();
    rig.link.send("mf 20");
    rig.link.send("reset");
    let mut passes = 0;
    let exit = rig.ctl.run(
        &mut rig.link,
        &mut rig.sensors,
        &rig.clock,
        &mut rig.events,
        || passes += 1,
    );
    assert_eq!(exit, LoopExit::ResetRequested);
    assert_eq!(passes, 1);
}

#[test]
fn closed_link_ends_the_loop() {
    let mut rig = Rig::new();
    rig.link.closed = true;
    assert_eq!(rig.service(), LoopStatus::Exit(LoopExit::TransportClosed));
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn pwm_failure_is_logged_and_loop_continues() {
    let mut rig = Rig::new();
    rig.ctl.sink_mut().fail_motor = true;
    let out = rig.send("30;10;");

    assert_eq!(out.len(), 2);
    assert_eq!(rig.pwm().writes, vec![(ActuatorId::Steering, 1550)]);
    assert!(rig
        .events
        .contains(&ControlEvent::Fault(Error::Actuator(ActuatorError::PwmWriteFailed))));
    assert_eq!(rig.service(), LoopStatus::Continue);
}

#[test]
fn controller_refuses_unsafe_limits() {
    for steering_limits in [
        PwmLimits { min_us: 1600, max_us: 1900 },
        PwmLimits { min_us: 1900, max_us: 1100 },
    ] {
        let config = ControllerConfig {
            steering_limits,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            Controller::new(MockPwm::new(), &config),
            Err(ConfigError::ValidationFailed(_))
        ));
    }
}
