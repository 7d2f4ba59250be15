// src/driver/serial.rs

use crate::common::{
    error::Ens210Error,
    hal_traits::{BridgeSerial, LineSource, Transport},
    line::{Line, LineBuffer},
};

/// Adapts a byte-level, non-blocking serial port into a line-oriented transport.
#[derive(Debug)]
pub struct SerialTransport<S>
where
    S: BridgeSerial,
{
    serial: S,
    rx: LineBuffer,
}

impl<S> SerialTransport<S>
where
    S: BridgeSerial,
{
    pub fn new(serial: S) -> Self {
        SerialTransport { serial, rx: LineBuffer::new() }
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Releases the serial port, dropping any partial line.
    pub fn into_inner(self) -> S {
        self.serial
    }
}

impl<S> Transport for SerialTransport<S>
where
    S: BridgeSerial,
{
    type Error = S::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        // Commands are at most a dozen bytes; waiting on the TX FIFO is bounded.
        for &byte in bytes {
            nb::block!(self.serial.write_byte(byte))?;
        }
        nb::block!(self.serial.flush())
    }
}

impl<S> LineSource for SerialTransport<S>
where
    S: BridgeSerial,
{
    fn poll_line(&mut self) -> nb::Result<Line, Ens210Error<Self::Error>> {
        loop {
            let byte = match self.serial.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(e)) => return Err(nb::Error::Other(Ens210Error::Io(e))),
            };
            if let Some(line) = self.rx.push::<S::Error>(byte).map_err(nb::Error::Other)? {
                return Ok(line);
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    // --- Mock Comm Error ---
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockCommError;

    // --- Mock Serial ---
    #[derive(Debug, Default)]
    struct MockSerial {
        read_queue: VecDeque<Result<u8, MockCommError>>,
        write_log: Vec<u8>,
        busy_writes: usize,
        flushes: usize,
    }

    impl MockSerial {
        fn stage_read_data(&mut self, data: &[u8]) {
            self.read_queue.extend(data.iter().copied().map(Ok));
        }
    }

    impl BridgeSerial for MockSerial {
        type Error = MockCommError;

        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            match self.read_queue.pop_front() {
                Some(Ok(byte)) => Ok(byte),
                Some(Err(e)) => Err(nb::Error::Other(e)),
                None => Err(nb::Error::WouldBlock),
            }
        }

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            if self.busy_writes > 0 {
                self.busy_writes -= 1;
                return Err(nb::Error::WouldBlock);
            }
            self.write_log.push(byte);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_send_writes_all_bytes_and_flushes() {
        let mut serial = MockSerial::default();
        serial.busy_writes = 3;
        let mut transport = SerialTransport::new(serial);
        transport.send(b"w431080p").unwrap();
        let serial = transport.into_inner();
        assert_eq!(serial.write_log, b"w431080p");
        assert_eq!(serial.flushes, 1);
    }

    #[test]
    fn test_poll_line_would_block_until_marker() {
        let mut transport = SerialTransport::new(MockSerial::default());
        transport.serial_mut().stage_read_data(b"w431080p[00]");
        assert!(matches!(transport.poll_line(), Err(nb::Error::WouldBlock)));

        transport.serial_mut().stage_read_data(b"\n>v3\n>");
        assert_eq!(transport.poll_line().unwrap().as_str(), "w431080p[00]");
        assert_eq!(transport.poll_line().unwrap().as_str(), "v3");
        assert!(matches!(transport.poll_line(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_poll_line_io_error() {
        let mut transport = SerialTransport::new(MockSerial::default());
        transport.serial_mut().read_queue.push_back(Err(MockCommError));
        assert!(matches!(
            transport.poll_line(),
            Err(nb::Error::Other(Ens210Error::Io(MockCommError)))
        ));
    }

    #[test]
    fn test_poll_line_overflow() {
        let mut transport = SerialTransport::new(MockSerial::default());
        let junk = [b'x'; 200];
        transport.serial_mut().stage_read_data(&junk);
        assert!(matches!(
            transport.poll_line(),
            Err(nb::Error::Other(Ens210Error::BufferOverflow { .. }))
        ));
    }
}
