// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Protocol driver for an ENS210 humidity/temperature sensor reached through a
//! USB-to-I2C bridge dongle with a line-oriented text protocol.
//!
//! [`common`] holds the wire vocabulary (commands, response matching, payload
//! decoding, CRC) and the host-facing traits. [`driver`] holds the session state
//! machine and the [`Driver`] that executes it against a transport, a timer and a sink.

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{DecodeError, DriverConfig, Ens210Error, Fault, Measurement};
pub use driver::{Driver, Report, Session, State, Status};
