// src/common/timing.rs

use core::time::Duration;

// Nominal values for the bridge firmware and the ENS210. The bridge answers
// well within the command timeout.

// === Flushing ===

/// Quiet period before the bridge is assumed drained after a stray line.
pub const FLUSH_SETTLE: Duration = Duration::from_millis(50);
/// Delay armed when the state machine (re)starts at `Flushing`.
pub const RESTART_DELAY: Duration = Duration::from_millis(100);

// === Command/Response ===

/// Maximum time from sending a command to receiving its response line.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

// === ENS210 conversion ===

/// Single-shot T+H conversion time (datasheet: 122 ms typ. for both channels).
pub const CONVERSION_DELAY: Duration = Duration::from_millis(130);

// === Retries ===

/// Reset retries allowed after the first reset before the machine restarts.
pub const RESET_RETRY_LIMIT: u8 = 50;

// === Line framing ===

/// Prompt the bridge prints after every response; it terminates a line.
pub const LINE_MARKER: &[u8] = b"\n>";
/// Longest response line the bridge produces, with headroom.
pub const MAX_LINE_LEN: usize = 96;
