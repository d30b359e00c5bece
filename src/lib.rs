//! RC chassis controller library.
//!
//! Exposes the pure-logic modules (protocol, mapping, actuation,
//! self-test, dispatcher) plus the adapters for integration testing and
//! the host binary.  Host-only adapters are behind the `host` feature.

#![deny(unused_must_use)]

pub mod actuation;
pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod mapping;
pub mod pins;
pub mod protocol;
pub mod safety;
pub mod selftest;
