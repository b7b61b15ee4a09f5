//! Error types for the cache crate
//!
//! Lookups never fail: a missing or expired key is reported as `None`.
//! The only fallible step is building a TTL cache.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background sweeper thread could not be started
    #[error("Failed to spawn sweeper thread: {0}")]
    SweeperSpawn(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
