//! Integration tests for the self-test sweep driven through the service
//! loop with a manual clock.

use rc_chassis::app::events::{ControlEvent, RejectReason};
use rc_chassis::app::ports::ActuatorId;
use rc_chassis::app::service::{LoopExit, LoopStatus};
use rc_chassis::config::ControllerConfig;
use rc_chassis::selftest::script::STEPS;
use rc_chassis::selftest::SequencerState;

use crate::rig::Rig;

const HOLD: u64 = 2000;

/// Run the sweep to completion, collecting every progress line.
fn run_to_completion(rig: &mut Rig) -> Vec<String> {
    let mut lines = rig.send("selftest");
    for _ in 0..STEPS.len() {
        lines.extend(rig.tick(HOLD));
    }
    lines
}

#[test]
fn sweep_reports_every_step_then_done() {
    let mut rig = Rig::new();
    let lines = run_to_completion(&mut rig);

    assert_eq!(lines[0], "selftest");
    assert_eq!(lines[1], "Self-test started");
    assert_eq!(lines[2], "Testing steering");
    assert_eq!(lines[3], "[1/15] Max left");
    assert_eq!(lines[9], "Testing motors");
    assert_eq!(lines[10], "[7/15] Motor neutral");
    assert_eq!(lines[18], "[15/15] Motor neutral");
    assert_eq!(lines.last().map(String::as_str), Some("Self-test DONE"));
    // Two phase headers on top of one line per step.
    assert_eq!(lines.len(), 2 + 2 + STEPS.len() + 1);

    assert_eq!(rig.ctl.selftest_state(), SequencerState::Idle);
    assert!(rig.ctl.is_neutral());
    assert!(rig.events.contains(&ControlEvent::SelfTestFinished));
}

#[test]
fn sweep_writes_the_scripted_pulses() {
    let mut rig = Rig::new();
    run_to_completion(&mut rig);

    assert_eq!(
        rig.pwm().writes_to(ActuatorId::Steering),
        // left, half-left, centre, half-right, right, centre, final neutral
        vec![1100, 1250, 1500, 1750, 1900, 1500, 1500]
    );
    assert_eq!(
        rig.pwm().writes_to(ActuatorId::Motor),
        vec![1600, 1750, 2000, 1500, 1400, 1250, 1000, 1500, 1500]
    );
}

#[test]
fn step_is_held_for_the_configured_time() {
    let mut rig = Rig::with_config(ControllerConfig {
        selftest_hold_ms: 500,
        ..ControllerConfig::default()
    });
    rig.send("selftest");
    assert!(rig.tick(499).is_empty());
    assert_eq!(rig.tick(1), ["[2/15] Half left"]);
}

#[test]
fn manual_commands_are_busy_during_sweep() {
    let mut rig = Rig::new();
    rig.send("selftest");
    let before = rig.pwm().writes.len();

    for line in ["50;-30;", "mf 40", "selftest", "help", "distance"] {
        let out = rig.send(line);
        assert_eq!(out[1], "Busy: self-test running, send 'reset' to abort", "{line}");
    }
    assert_eq!(rig.pwm().writes.len(), before);
    assert_eq!(rig.sensors.reads, 0);
    assert!(rig.events.contains(&ControlEvent::CommandRejected {
        command: "drive",
        reason: RejectReason::Busy,
    }));
}

#[test]
fn reset_during_first_hold_aborts_to_neutral() {
    let mut rig = Rig::new();
    rig.send("selftest");
    rig.tick(HOLD / 2);
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1100));

    rig.link.send("reset");
    assert_eq!(rig.service(), LoopStatus::Exit(LoopExit::ResetRequested));
    assert_eq!(rig.link.take_output(), ["reset", "Ok."]);

    assert_eq!(rig.ctl.selftest_state(), SequencerState::Idle);
    assert!(rig.ctl.is_neutral());
    assert_eq!(rig.pwm().last(ActuatorId::Steering), Some(1500));
    assert!(rig
        .events
        .contains(&ControlEvent::SelfTestAborted { at_step: 1 }));

    // The sweep does not resume, and manual commands work again.
    assert!(rig.tick(HOLD * 10).is_empty());
    rig.send("mf 20");
    assert_eq!(rig.pwm().last(ActuatorId::Motor), Some(1600));
}

#[test]
fn reset_queued_behind_selftest_is_seen_next_pass() {
    let mut rig = Rig::new();
    rig.link.send("selftest");
    rig.link.send("reset");
    assert_eq!(rig.service(), LoopStatus::Continue);
    assert_eq!(rig.service(), LoopStatus::Exit(LoopExit::ResetRequested));
    assert_eq!(
        rig.link.take_output(),
        [
            "selftest",
            "Self-test started",
            "Testing steering",
            "[1/15] Max left",
            "reset",
            "Ok."
        ]
    );
    assert!(rig.ctl.is_neutral());
}

#[test]
fn sweep_can_run_again_after_finishing() {
    let mut rig = Rig::new();
    run_to_completion(&mut rig);
    let out = rig.send("selftest");
    assert_eq!(
        out,
        ["selftest", "Self-test started", "Testing steering", "[1/15] Max left"]
    );
}
