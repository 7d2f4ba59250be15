// src/common/config.rs

use core::time::Duration;

use super::timing;
use super::types::CrcCheck;

/// Tunables for one driver session.
///
/// `Default` reproduces the timings the bridge firmware was validated with; the
/// `with_*` setters adjust individual values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Re-armed in `Flushing` each time a stray line is drained.
    pub flush_settle: Duration,
    /// Armed when the machine (re)enters `Flushing`.
    pub restart_delay: Duration,
    /// Deadline for every command response.
    pub command_timeout: Duration,
    /// Wait between the single-shot start and the measurement read.
    pub conversion_delay: Duration,
    /// Consecutive non-acknowledged resets tolerated before restarting.
    pub reset_retry_limit: u8,
    /// CRC-7 policy for measurement payloads.
    pub crc_check: CrcCheck,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            flush_settle: timing::FLUSH_SETTLE,
            restart_delay: timing::RESTART_DELAY,
            command_timeout: timing::COMMAND_TIMEOUT,
            conversion_delay: timing::CONVERSION_DELAY,
            reset_retry_limit: timing::RESET_RETRY_LIMIT,
            crc_check: CrcCheck::Skip,
        }
    }
}

impl DriverConfig {
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_conversion_delay(mut self, delay: Duration) -> Self {
        self.conversion_delay = delay;
        self
    }

    pub fn with_flush_timing(mut self, settle: Duration, restart: Duration) -> Self {
        self.flush_settle = settle;
        self.restart_delay = restart;
        self
    }

    /// A limit of 0 is treated as 1: the first failed reset restarts the machine.
    pub fn with_reset_retry_limit(mut self, limit: u8) -> Self {
        self.reset_retry_limit = limit.max(1);
        self
    }

    pub fn with_crc_check(mut self, check: CrcCheck) -> Self {
        self.crc_check = check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.flush_settle, Duration::from_millis(50));
        assert_eq!(config.restart_delay, Duration::from_millis(100));
        assert_eq!(config.command_timeout, Duration::from_millis(500));
        assert_eq!(config.conversion_delay, Duration::from_millis(130));
        assert_eq!(config.reset_retry_limit, 50);
        assert_eq!(config.crc_check, CrcCheck::Skip);
    }

    #[test]
    fn test_builders() {
        let config = DriverConfig::default()
            .with_command_timeout(Duration::from_millis(250))
            .with_conversion_delay(Duration::from_millis(200))
            .with_flush_timing(Duration::from_millis(10), Duration::from_millis(20))
            .with_reset_retry_limit(0)
            .with_crc_check(CrcCheck::Verify);
        assert_eq!(config.command_timeout, Duration::from_millis(250));
        assert_eq!(config.conversion_delay, Duration::from_millis(200));
        assert_eq!(config.flush_settle, Duration::from_millis(10));
        assert_eq!(config.restart_delay, Duration::from_millis(20));
        assert_eq!(config.reset_retry_limit, 1);
        assert_eq!(config.crc_check, CrcCheck::Verify);
    }
}
