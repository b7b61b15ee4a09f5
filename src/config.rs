//! Configuration Module
//!
//! Tunables for the TTL cache's background sweeper.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default pause between two sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of expired entries removed per lock acquisition
pub const DEFAULT_SWEEP_BATCH_SIZE: usize = 256;

/// TTL cache configuration parameters.
///
/// Values can be loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlConfig {
    /// Time between two background sweeps
    pub sweep_interval: Duration,
    /// Maximum expired entries removed while holding the lock once
    pub sweep_batch_size: usize,
}

impl TtlConfig {
    /// Creates a new TtlConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMOCACHE_SWEEP_INTERVAL_MS` - Sweep interval in milliseconds (default: 1000)
    /// - `MEMOCACHE_SWEEP_BATCH_SIZE` - Entries removed per lock hold (default: 256)
    pub fn from_env() -> Self {
        Self {
            sweep_interval: env::var("MEMOCACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL),
            sweep_batch_size: env::var("MEMOCACHE_SWEEP_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_BATCH_SIZE),
        }
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the sweep batch size.
    pub fn with_sweep_batch_size(mut self, batch_size: usize) -> Self {
        self.sweep_batch_size = batch_size;
        self
    }

    /// Rejects values the sweeper cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be non-zero".to_string(),
            ));
        }
        if self.sweep_batch_size == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep_batch_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }
}
