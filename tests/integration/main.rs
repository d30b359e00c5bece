//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the controller through
//! its ports against mock adapters.  Everything runs on the host with no
//! hardware and no real time passing.

mod dispatch_tests;
mod mock_hw;
mod rig;
mod selftest_flow_tests;
