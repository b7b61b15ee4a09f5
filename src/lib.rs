//! Memocache - generic thread-safe in-memory caches
//!
//! Provides a long-lived `Cache` and a `TtlCache` with lazy expiration
//! and a background sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, TtlCache};
pub use config::TtlConfig;
pub use error::{CacheError, Result};
