//! Bridge command definitions.
//!
//! The dongle accepts a tiny ASCII language: `v` asks for the firmware version,
//! `wAA..p` writes bytes to I2C address `AA`, `rAANNp` reads `NN` bytes, and
//! several segments may be chained before the final `p`. The ENS210 lives at
//! 7-bit address `0x43`, so every sensor transaction starts with `w43`/`r43`.

use core::fmt;

use super::response::ResponsePattern;

/// Represents a command the state machine sends to the bridge.
///
/// Commands are fixed templates; the `Display` implementation yields the exact
/// text put on the wire (e.g. `w431080p`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Version query (`v`) - the bridge answers with its firmware tag, e.g. `v3`.
    Version,

    /// Sensor reset (`w431080p`) - writes `0x80` (RESET) to SYS_CTRL (`0x10`).
    ResetSensor,

    /// Single-shot start (`w43210003p`) - writes SENS_RUN=`0x00` and SENS_START=`0x03`
    /// (registers `0x21`, `0x22`), triggering one T and one H conversion.
    StartSingleShot,

    /// Measurement read (`w4330r4306p`) - sets the register pointer to T_VAL (`0x30`)
    /// and reads the six bytes T_VAL[3] + H_VAL[3].
    ReadMeasurement,
}

impl Command {
    /// Returns the literal command text.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Version => "v",
            Command::ResetSensor => "w431080p",
            Command::StartSingleShot => "w43210003p",
            Command::ReadMeasurement => "w4330r4306p",
        }
    }

    /// Encodes the command into the bytes handed to the transport.
    ///
    /// Pure and total: every command is plain ASCII, one byte per character.
    #[inline]
    pub const fn encode(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// The response shape the bridge produces for this command.
    pub const fn expected_response(&self) -> ResponsePattern {
        match self {
            Command::Version => ResponsePattern::Version,
            Command::ResetSensor => ResponsePattern::ResetAck,
            Command::StartSingleShot => ResponsePattern::StartAck,
            Command::ReadMeasurement => ResponsePattern::Measurement,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
