// src/common/response/parse.rs

use super::{MatchResult, ResponsePattern};
use crate::common::command::Command;
use crate::common::types::PAYLOAD_HEX_LEN;

/// Status byte the bridge prints for an acknowledged I2C transfer.
const STATUS_ACK: &str = "00";

// --- Internal Helpers ---

/// Splits `[inner]rest` into `(inner, rest)`.
#[inline]
fn bracketed(s: &str) -> Option<(&str, &str)> {
    let s = s.strip_prefix('[')?;
    let end = s.find(']')?;
    Some((&s[..end], &s[end + 1..]))
}

#[inline]
fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn match_version(line: &str) -> Option<&str> {
    match line.as_bytes() {
        [b'v', digit] if digit.is_ascii_digit() => Some(line),
        _ => None,
    }
}

/// `<echo>[00]` and nothing else.
fn match_ack(line: &str, echo: &str) -> Option<()> {
    let (status, rest) = bracketed(line.strip_prefix(echo)?)?;
    (status == STATUS_ACK && rest.is_empty()).then_some(())
}

/// `w4330[00]r4306p[<12 hex>]` and nothing else.
fn match_measurement(line: &str) -> Option<&str> {
    let (status, rest) = bracketed(line.strip_prefix("w4330")?)?;
    if status != STATUS_ACK {
        return None;
    }
    let (hex, rest) = bracketed(rest.strip_prefix("r4306p")?)?;
    (rest.is_empty() && hex.len() == PAYLOAD_HEX_LEN && is_lower_hex(hex)).then_some(hex)
}

// --- Public Matching Function ---

/// Matches one response line against the expected pattern.
///
/// The check is anchored on both ends: after trimming surrounding ASCII
/// whitespace (the bridge may leave a `\r` before the prompt), the whole line
/// must have the expected shape. Trailing or leading text yields `NoMatch`.
pub fn match_line<'a>(pattern: ResponsePattern, line: &'a str) -> MatchResult<'a> {
    let line = line.trim_matches(|c: char| c.is_ascii_whitespace());
    match pattern {
        ResponsePattern::Version => match_version(line).map_or(MatchResult::NoMatch, MatchResult::Payload),
        ResponsePattern::ResetAck => match_ack(line, Command::ResetSensor.as_str())
            .map_or(MatchResult::NoMatch, |_| MatchResult::Ack),
        ResponsePattern::StartAck => match_ack(line, Command::StartSingleShot.as_str())
            .map_or(MatchResult::NoMatch, |_| MatchResult::Ack),
        ResponsePattern::Measurement => {
            match_measurement(line).map_or(MatchResult::NoMatch, MatchResult::Payload)
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_version() {
        assert_eq!(match_line(ResponsePattern::Version, "v3"), MatchResult::Payload("v3"));
        assert_eq!(match_line(ResponsePattern::Version, "v0\r"), MatchResult::Payload("v0"));
        assert_eq!(match_line(ResponsePattern::Version, " v9 "), MatchResult::Payload("v9"));
    }

    #[test]
    fn test_match_version_rejects_remainder() {
        assert_eq!(match_line(ResponsePattern::Version, "v3 extra"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::Version, "v31"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::Version, "xv3"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::Version, "v"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::Version, "va"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::Version, ""), MatchResult::NoMatch);
    }

    #[test]
    fn test_match_reset_ack() {
        assert_eq!(match_line(ResponsePattern::ResetAck, "w431080p[00]"), MatchResult::Ack);
        assert_eq!(match_line(ResponsePattern::ResetAck, "w431080p[00]\r"), MatchResult::Ack);
        // NACK status from the bridge (no sensor on the bus)
        assert_eq!(match_line(ResponsePattern::ResetAck, "w431080p[01]"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::ResetAck, "w431080p[00]x"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::ResetAck, "w431080p"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::ResetAck, "w43210003p[00]"), MatchResult::NoMatch);
    }

    #[test]
    fn test_match_start_ack() {
        assert_eq!(match_line(ResponsePattern::StartAck, "w43210003p[00]"), MatchResult::Ack);
        assert_eq!(match_line(ResponsePattern::StartAck, "w43210003p[02]"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::StartAck, "w43210003p[00"), MatchResult::NoMatch);
        assert_eq!(match_line(ResponsePattern::StartAck, "w431080p[00]"), MatchResult::NoMatch);
    }

    #[test]
    fn test_match_measurement() {
        assert_eq!(
            match_line(ResponsePattern::Measurement, "w4330[00]r4306p[0064c700407b]"),
            MatchResult::Payload("0064c700407b")
        );
        assert_eq!(
            match_line(ResponsePattern::Measurement, "w4330[00]r4306p[0064c700407b]\r"),
            MatchResult::Payload("0064c700407b")
        );
    }

    #[test]
    fn test_match_measurement_rejects() {
        fn reject(line: &str) -> MatchResult<'_> {
            match_line(ResponsePattern::Measurement, line)
        }

        // Pointer write not acknowledged
        assert_eq!(reject("w4330[01]r4306p[0064c700407b]"), MatchResult::NoMatch);
        // Wrong width
        assert_eq!(reject("w4330[00]r4306p[0064c700407]"), MatchResult::NoMatch);
        assert_eq!(reject("w4330[00]r4306p[0064c700407b00]"), MatchResult::NoMatch);
        // Uppercase is not what the bridge prints
        assert_eq!(reject("w4330[00]r4306p[0064C700407B]"), MatchResult::NoMatch);
        // Trailing remainder
        assert_eq!(reject("w4330[00]r4306p[0064c700407b]w43"), MatchResult::NoMatch);
        // Missing read segment
        assert_eq!(reject("w4330[00]"), MatchResult::NoMatch);
        assert_eq!(reject("garbage"), MatchResult::NoMatch);
    }

    #[test]
    fn test_match_result_helpers() {
        assert!(MatchResult::Ack.is_ack());
        assert!(!MatchResult::NoMatch.is_ack());
        assert_eq!(MatchResult::Payload("v3").payload(), Some("v3"));
        assert_eq!(MatchResult::Ack.payload(), None);
    }
}
