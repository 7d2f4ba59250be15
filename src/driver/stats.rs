// src/driver/stats.rs

use core::fmt;

use crate::common::error::DecodeError;
use crate::common::types::Measurement;

// Seeds for the running bounds; any real reading narrows past them.
const T_MIN_SEED: f64 = 250.0;
const T_MAX_SEED: f64 = -100.0;
const H_MIN_SEED: f64 = 100.0;
const H_MAX_SEED: f64 = 0.0;

/// Weight of the previous average in the interval smoothing.
const SMOOTHING: f64 = 0.9;

/// Running statistics over the read cycles since the last sensor reset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stats {
    /// Completed read cycles, including ones that failed to decode.
    pub count: u32,
    /// Exponentially smoothed interval between read cycles; `None` before the 2nd.
    pub avg_interval_ms: Option<f64>,
    pub t_min: f64,
    pub t_max: f64,
    pub h_min: f64,
    pub h_max: f64,
    last_sample_ms: Option<u64>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub const fn new() -> Self {
        Stats {
            count: 0,
            avg_interval_ms: None,
            t_min: T_MIN_SEED,
            t_max: T_MAX_SEED,
            h_min: H_MIN_SEED,
            h_max: H_MAX_SEED,
            last_sample_ms: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Accounts one read cycle at `now_ms`.
    ///
    /// Every cycle counts towards `count` and the interval average; only
    /// successfully decoded samples widen the min/max bounds.
    pub fn record(&mut self, now_ms: u64, sample: &Result<Measurement, DecodeError>) {
        self.count = self.count.saturating_add(1);

        if let Some(last) = self.last_sample_ms {
            let delta = now_ms.saturating_sub(last) as f64;
            self.avg_interval_ms = Some(match self.avg_interval_ms {
                None => delta,
                Some(avg) => avg * SMOOTHING + delta * (1.0 - SMOOTHING),
            });
        }
        self.last_sample_ms = Some(now_ms);

        if let Ok(m) = sample {
            self.t_min = self.t_min.min(m.temperature_c);
            self.t_max = self.t_max.max(m.temperature_c);
            self.h_min = self.h_min.min(m.humidity_rh);
            self.h_max = self.h_max.max(m.humidity_rh);
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.count)?;
        if let Some(avg) = self.avg_interval_ms {
            write!(f, " ({:.0}ms)", avg)?;
        }
        Ok(())
    }
}
