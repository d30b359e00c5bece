//! Fuzz target: `protocol::parse`
//!
//! Arbitrary text must always parse to some `Command` without panicking,
//! and any accepted setpoint must lie inside the normalized domain.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use rc_chassis::app::commands::Command;
use rc_chassis::protocol::parse;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    match parse(&line) {
        Command::SetMotor(v) | Command::SetSteering(v) => {
            assert!((-100..=100).contains(&v.get()));
        }
        Command::Drive { speed, steering } => {
            assert!((-100..=100).contains(&speed.get()));
            assert!((-100..=100).contains(&steering.get()));
        }
        _ => {}
    }
});
