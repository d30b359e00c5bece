//! Fuzz target: `LineDecoder::push`
//!
//! Drives arbitrary bytes through the line decoder and checks that no
//! yielded line exceeds the cap or carries a terminator, and that a reset
//! leaves the decoder empty.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use rc_chassis::adapters::serial::LineDecoder;
use rc_chassis::app::commands::MAX_LINE_LEN;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    for &b in data {
        if let Some(line) = decoder.push(b) {
            assert!(line.len() <= MAX_LINE_LEN);
            assert!(!line.contains('\n'));
        }
        assert!(decoder.pending() <= MAX_LINE_LEN);
    }

    decoder.reset();
    assert_eq!(decoder.pending(), 0);
});
