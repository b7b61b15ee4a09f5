//! Cache Entry Module
//!
//! Defines the entry shapes stored by the plain and the TTL cache.

use std::time::{Duration, Instant};

/// Furthest expiration horizon; TTLs beyond it are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A plain cache entry holding exactly one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V) -> Self {
        Self { value }
    }
}

// == TTL Entry ==
/// A value paired with the absolute instant after which it is absent.
#[derive(Debug, Clone)]
pub struct TtlEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant on the monotonic clock
    pub expires_at: Instant,
}

impl<V> TtlEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    ///
    /// A zero TTL yields an entry that is already expired.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        let ttl = ttl.min(MAX_TTL);
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry whose expiration instant equals `now`
    /// is expired.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks expiration against the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, `Duration::ZERO` once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_plain_entry_holds_value() {
        let entry = CacheEntry::new("test_value");
        assert_eq!(entry.value, "test_value");
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = TtlEntry::new("test_value", Duration::from_secs(60), Instant::now());

        assert_eq!(entry.value, "test_value");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = TtlEntry::new("test_value", Duration::from_millis(100), Instant::now());

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(150));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_pre_expired() {
        let entry = TtlEntry::new(1, Duration::ZERO, Instant::now());
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = TtlEntry::new("test", Duration::from_secs(5), now);

        assert!(!entry.is_expired_at(now + Duration::from_millis(4999)));
        assert!(entry.is_expired_at(now + Duration::from_secs(5)), "Entry should be expired at boundary");
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = TtlEntry::new("test_value", Duration::from_secs(10), now);

        assert_eq!(entry.ttl_remaining_at(now), Duration::from_secs(10));
        assert_eq!(entry.ttl_remaining_at(now + Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(entry.ttl_remaining_at(now + Duration::from_secs(11)), Duration::ZERO);
    }

    #[test]
    fn test_huge_ttl_is_clamped_and_still_expires() {
        let now = Instant::now();
        let entry = TtlEntry::new("test", Duration::MAX, now);

        assert!(!entry.is_expired_at(now));
        assert!(entry.ttl_remaining_at(now) <= MAX_TTL);
    }
}
