// src/common/error.rs

/// Errors surfaced to the host by the driver and transport helpers.
#[derive(Debug, thiserror::Error)]
pub enum Ens210Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A response line grew past the reassembly buffer without a line marker.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// A protocol anomaly, for hosts that drive the session themselves.
    #[error("Protocol fault: {0}")]
    Fault(#[from] Fault),

    /// A measurement payload that failed to decode.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Anomalies the state machine recovers from by restarting at `Flushing`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Fault {
    /// No response arrived before the deadline.
    #[error("timeout")]
    Timeout,

    /// A response arrived but did not have the expected shape.
    #[error("protocol mismatch")]
    ProtocolMismatch,

    /// The sensor never acknowledged a reset within the retry limit.
    #[error("sensor reset retries exhausted")]
    InitRetryExhausted,
}

/// Measurement payload failures. These end one read cycle; the loop continues.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The CRC-7 of a field does not match the data bits.
    #[error("CRC mismatch")]
    Crc,

    /// The validity bit of a field is clear (conversion not completed).
    #[error("invalid reading")]
    Invalid,

    /// The payload is not exactly 12 hex digits.
    #[error("malformed payload")]
    Malformed,
}

impl DecodeError {
    /// Short tag shown in place of a value, e.g. `err:crc`.
    pub const fn tag(&self) -> &'static str {
        match self {
            DecodeError::Crc => "err:crc",
            DecodeError::Invalid => "err:val",
            DecodeError::Malformed => "err:fmt",
        }
    }
}
