//! Application core: pure domain logic, zero I/O.
//!
//! Command dispatch, the neutral-safety rules and the self-test schedule
//! live here.  All interaction with hardware happens through the **port
//! traits** defined in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod response;
pub mod service;
