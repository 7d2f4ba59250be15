// src/driver/deadline.rs

use core::time::Duration;

use crate::common::error::Fault;

/// Identifies one arming of the session deadline.
///
/// Hosts echo the token back when the timer fires; an expiry whose token is no
/// longer the pending one is stale and gets dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerToken(u32);

impl TimerToken {
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// The session's single outstanding deadline.
///
/// Arming always replaces the previous deadline, so at most one is ever pending.
#[derive(Debug, Default)]
pub struct Deadline {
    generation: u32,
    pending: Option<(TimerToken, Duration)>,
}

impl Deadline {
    pub const fn new() -> Self {
        Deadline { generation: 0, pending: None }
    }

    /// Arms a new deadline, implicitly cancelling any pending one.
    pub fn arm(&mut self, after: Duration) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        self.pending = Some((token, after));
        token
    }

    /// Cancels the pending deadline; returns its token if there was one.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take().map(|(token, _)| token)
    }

    /// Consumes an expiry. Returns false (and changes nothing) for a stale token.
    pub fn expire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some((pending, _)) if pending == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending.map(|(token, _)| token)
    }

    pub fn pending_duration(&self) -> Option<Duration> {
        self.pending.map(|(_, after)| after)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

/// Bounded counter of failed sensor resets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryCounter {
    count: u8,
    limit: u8,
}

impl RetryCounter {
    pub const fn new(limit: u8) -> Self {
        RetryCounter { count: 0, limit }
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    pub const fn limit(&self) -> u8 {
        self.limit
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Records one failure.
    ///
    /// Returns the retry number while retries remain, or
    /// `Fault::InitRetryExhausted` once `limit` retries have been used up.
    pub fn record_failure(&mut self) -> Result<u8, Fault> {
        if self.count >= self.limit {
            return Err(Fault::InitRetryExhausted);
        }
        self.count += 1;
        Ok(self.count)
    }
}
