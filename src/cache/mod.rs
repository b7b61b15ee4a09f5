//! Cache Module
//!
//! Provides the long-lived `Cache` and the expiring `TtlCache`.

mod entry;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use entry::{CacheEntry, TtlEntry, MAX_TTL};
pub use stats::CacheStats;
pub use store::Cache;
pub use ttl::TtlCache;
