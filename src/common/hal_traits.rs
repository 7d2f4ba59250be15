// src/common/hal_traits.rs

use core::fmt::Debug;
use core::time::Duration;

use super::error::Ens210Error;
use super::line::Line;
use crate::driver::{Report, Status, TimerToken};

/// Outbound half of the link to the bridge.
pub trait Transport {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Sends an encoded command. Fire-and-forget: the response comes back as a line.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Transports that can be polled for reassembled response lines.
///
/// Event-driven hosts (USB callbacks, async readers) do not need this; they hand
/// lines to the driver directly. It exists for polled byte-level serial ports.
pub trait LineSource: Transport {
    /// Returns the next complete line, or `Err(nb::Error::WouldBlock)` if none is
    /// available yet.
    fn poll_line(&mut self) -> nb::Result<Line, Ens210Error<Self::Error>>;
}

/// Single-slot timer provided by the host.
pub trait Timer {
    /// Schedules one expiry after `after`, replacing any pending one.
    ///
    /// When it fires the host calls `Driver::on_timeout` with the same token.
    fn arm(&mut self, token: TimerToken, after: Duration);

    /// Cancels the pending expiry, if any.
    fn cancel(&mut self);

    /// Monotonic milliseconds, used for sample interval statistics.
    fn now_ms(&self) -> u64;
}

/// Receiver of everything the driver has to tell the outside world.
pub trait Sink {
    /// Phase changes: probing, firmware found, sensor found/not found, restarts.
    fn status(&mut self, status: &Status);

    /// One completed read cycle (a measurement or a decode error) plus statistics.
    fn report(&mut self, report: &Report);
}

/// Abstraction for non-blocking byte-level serial communication with the bridge.
pub trait BridgeSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}
