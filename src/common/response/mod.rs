// src/common/response/mod.rs

pub mod parse;

pub use parse::match_line;

/// Shape of the line the bridge sends back for each command.
///
/// The bridge echoes what it executed: every I2C write segment is followed by a
/// bracketed status byte (`[00]` = ACK), and every read segment by the bytes read,
/// in lowercase hex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponsePattern {
    /// `v<digit>` - firmware tag for the version query.
    Version,
    /// `w431080p[00]` - sensor reset acknowledged.
    ResetAck,
    /// `w43210003p[00]` - single-shot start acknowledged.
    StartAck,
    /// `w4330[00]r4306p[<12 hex>]` - pointer write acknowledged, six bytes read.
    Measurement,
}

/// Outcome of matching a response line against a [`ResponsePattern`].
///
/// `NoMatch` is an ordinary result: the state machine decides what it means.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatchResult<'a> {
    /// Bare acknowledgement.
    Ack,
    /// Captured text: the version tag or the measurement hex digits.
    Payload(&'a str),
    /// The line does not have the expected shape.
    NoMatch,
}

impl<'a> MatchResult<'a> {
    pub fn is_ack(&self) -> bool {
        matches!(self, MatchResult::Ack)
    }

    pub fn payload(&self) -> Option<&'a str> {
        match self {
            MatchResult::Payload(p) => Some(p),
            _ => None,
        }
    }
}
