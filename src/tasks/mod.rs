//! Background Tasks Module
//!
//! Contains the periodic sweeper that reclaims expired TTL cache entries.

mod sweeper;

pub use sweeper::Sweeper;
