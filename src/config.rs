//! Configuration Module
//!
//! Construction-time settings for a cache instance.

use std::time::Duration;

/// Default interval between background sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest sweep interval accepted; Tokio intervals cannot tick at zero.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_millis(1);

/// Cache configuration parameters.
///
/// # Example
/// ```
/// use addcache::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default().with_cleanup_interval(Duration::from_secs(5));
/// assert_eq!(config.cleanup_interval, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Interval between background sweeps of expired entries
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval, clamped to [`MIN_CLEANUP_INTERVAL`].
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval.max(MIN_CLEANUP_INTERVAL);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}
