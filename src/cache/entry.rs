//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value, shared with callers of `get`
    pub value: Arc<V>,
    /// Insertion or last-overwrite instant
    pub created_at: Instant,
    /// Time to live measured from `created_at`, None = persistent
    pub ttl: Option<Duration>,
}

// Manual impl: `Arc<V>` is cloneable for any `V`.
impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            created_at: self.created_at,
            ttl: self.ttl,
        }
    }
}

impl<V> CacheEntry<V> {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn persistent(value: Arc<V>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl: None,
        }
    }

    /// Creates an entry that expires `ttl` after now.
    pub fn expiring(value: Arc<V>, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl: Some(ttl),
        }
    }

    /// Returns true if the entry never expires.
    pub fn is_persistent(&self) -> bool {
        self.ttl.is_none()
    }

    // == Expiry ==
    /// Absolute expiry instant, or None for persistent entries.
    ///
    /// A ttl too large to represent as an instant also yields None.
    pub fn expires_at(&self) -> Option<Instant> {
        self.ttl.and_then(|ttl| self.created_at.checked_add(ttl))
    }

    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its expiry
    /// instant, so a zero ttl is expired immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at() {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry has expired as of the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Remaining time to live, `Some(ZERO)` once expired, None if persistent.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at()
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
