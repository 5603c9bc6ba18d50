//! Cache Handle Module
//!
//! The public, cloneable cache: storage and hooks behind locks, plus the
//! background sweeper.
//!
//! # Locking
//! Live reads take the store's read lock. Every mutation, including the
//! reap step of a lazy-expiring `get` and the sweep pass, takes the write
//! lock. Hooks run inline: Create hooks under a read guard downgraded from
//! the write that produced them, Delete hooks under the write guard that
//! removed the entry. A slow hook therefore stalls the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::cache::hooks::{Hook, HookRegistry, Operation};
use crate::cache::key;
use crate::cache::store::{CacheStore, Lookup};
use crate::cache::CacheEntry;
use crate::config::{CacheConfig, MIN_CLEANUP_INTERVAL};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, CleanupHandle};

/// State shared between every handle and the sweeper.
pub(crate) struct Shared<V> {
    store: RwLock<CacheStore<V>>,
    hooks: RwLock<HookRegistry<V>>,
}

impl<V> Shared<V> {
    /// One sweep pass: reaps every expired entry under the write lock and
    /// fires Delete hooks for each before releasing it.
    pub(crate) async fn sweep(&self) -> usize {
        let mut store = self.store.write().await;
        let removed = store.cleanup_expired(Instant::now());
        if !removed.is_empty() {
            let hooks = self.hooks.read().await;
            for (key, entry) in &removed {
                hooks.dispatch(Operation::Delete, key, &entry.value);
            }
        }
        removed.len()
    }
}

// == Cache ==
/// Thread-safe key-value cache with optional per-entry expiry and hooks.
///
/// Cloning yields another handle to the same cache. The background sweeper
/// runs until [`stop_cleanup`](Cache::stop_cleanup) is called or the last
/// handle is dropped.
///
/// # Example
/// ```
/// use addcache::{Cache, Operation};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let cache: Cache<String> = Cache::new();
/// cache.on(Operation::Delete, |key, _| println!("{key} gone")).await;
///
/// let key = cache.create_key(["user", "12"]);
/// cache.set_with_expiry(&key, "Alice".to_string(), Duration::from_secs(40)).await;
/// assert_eq!(*cache.get(&key).await.unwrap(), "Alice");
///
/// cache.stop_cleanup().await;
/// # });
/// ```
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
    cleanup: Arc<Mutex<Option<CleanupHandle>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cleanup: Arc::clone(&self.cleanup),
        }
    }
}

impl<V: Send + Sync + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache sweeping at the default interval.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache sweeping every `interval`.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_interval(interval: Duration) -> Self {
        Self::with_config(CacheConfig::default().with_cleanup_interval(interval))
    }

    /// Creates a cache from a full configuration.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_config(config: CacheConfig) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "addcache::Cache requires a Tokio runtime to spawn its cleanup task; \
                 construct it from within #[tokio::main], #[tokio::test] or a runtime context"
            );
        }

        let shared = Arc::new(Shared {
            store: RwLock::new(CacheStore::new()),
            hooks: RwLock::new(HookRegistry::new()),
        });
        let interval = config.cleanup_interval.max(MIN_CLEANUP_INTERVAL);
        let handle = spawn_cleanup_task(Arc::clone(&shared), interval);

        Self {
            shared,
            cleanup: Arc::new(Mutex::new(Some(handle))),
        }
    }
}

impl<V: Send + Sync + 'static> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> {
    // == Set ==
    /// Stores `value` under `key` with no expiration, replacing any entry.
    ///
    /// Create hooks fire after the write is visible.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Arc<V>>) {
        self.insert(key.into(), CacheEntry::persistent(value.into()))
            .await;
    }

    // == Set With Expiry ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A zero ttl is accepted; the entry is reported missing on the next read.
    pub async fn set_with_expiry(
        &self,
        key: impl Into<String>,
        value: impl Into<Arc<V>>,
        ttl: Duration,
    ) {
        self.insert(key.into(), CacheEntry::expiring(value.into(), ttl))
            .await;
    }

    async fn insert(&self, key: String, entry: CacheEntry<V>) {
        let value = Arc::clone(&entry.value);
        let mut store = self.shared.store.write().await;
        store.insert(key.clone(), entry);
        // Downgrade so readers see the write while other writers wait for the
        // hooks, keeping Create events in write order.
        let _store = store.downgrade();
        trace!(key = %key, "cache set");

        let hooks = self.shared.hooks.read().await;
        hooks.dispatch(Operation::Create, &key, &value);
    }

    // == Get ==
    /// Returns the value stored under `key`.
    ///
    /// An expired entry is removed here, firing Delete hooks, and reported
    /// as [`CacheError::KeyNotFound`] just like an absent key.
    pub async fn get(&self, key: &str) -> Result<Arc<V>> {
        {
            let store = self.shared.store.read().await;
            match store.lookup(key, Instant::now()) {
                Lookup::Live(entry) => return Ok(entry.value),
                Lookup::Missing => return Err(CacheError::KeyNotFound(key.to_string())),
                Lookup::Expired => {}
            }
        }

        // Re-check under the write lock: another caller may have reaped or
        // replaced the entry since the read lock was released.
        let mut store = self.shared.store.write().await;
        let now = Instant::now();
        if let Some(expired) = store.reap_if_expired(key, now) {
            debug!(key = %key, "lazily reaped expired entry");
            let hooks = self.shared.hooks.read().await;
            hooks.dispatch(Operation::Delete, key, &expired.value);
        }

        match store.lookup(key, now) {
            Lookup::Live(entry) => Ok(entry.value),
            Lookup::Expired | Lookup::Missing => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    // == Delete ==
    /// Removes the entry for `key`. Delete hooks fire only if one existed.
    pub async fn delete(&self, key: &str) {
        let mut store = self.shared.store.write().await;
        if let Some(entry) = store.remove(key) {
            trace!(key = %key, "cache delete");
            let hooks = self.shared.hooks.read().await;
            hooks.dispatch(Operation::Delete, key, &entry.value);
        }
    }

    // == Keys ==
    /// Joins `parts` with `:`. See [`create_key`](crate::create_key).
    pub fn create_key<I, S>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        key::create_key(parts)
    }

    /// Joins `parts` with `delimiter`.
    pub fn create_key_with_delimiter<I, S>(&self, delimiter: &str, parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        key::create_key_with_delimiter(delimiter, parts)
    }

    // == Hooks ==
    /// Appends `hooks` to those registered for `operation`.
    ///
    /// Hooks run synchronously inside the triggering operation, including
    /// expirations found by `get` or the sweeper. They are not isolated: a
    /// panicking hook unwinds through the operation that fired it, and a
    /// blocking hook stalls every other operation on the cache.
    pub async fn set_hook<I>(&self, operation: Operation, hooks: I)
    where
        I: IntoIterator<Item = Hook<V>>,
    {
        let mut registry = self.shared.hooks.write().await;
        registry.register(operation, hooks);
        debug!(%operation, total = registry.count(operation), "hooks registered");
    }

    /// Registers a single closure for `operation`.
    pub async fn on<F>(&self, operation: Operation, f: F)
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        let hook: Hook<V> = Arc::new(f);
        self.set_hook(operation, [hook]).await;
    }

    // == Cleanup ==
    /// Runs one sweep pass now and returns the number of entries reaped.
    pub async fn cleanup_expired(&self) -> usize {
        self.shared.sweep().await
    }

    /// Stops the background sweeper and waits for it to exit.
    ///
    /// Safe to call repeatedly or concurrently: later callers wait for the
    /// first handshake and then return. Lazy expiration on `get` continues.
    pub async fn stop_cleanup(&self) {
        let mut cleanup = self.cleanup.lock().await;
        if let Some(handle) = cleanup.take() {
            handle.stop().await;
        }
    }

    /// Returns true until the sweeper has been stopped.
    pub async fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Length ==
    /// Number of entries held, including expired ones not yet reaped.
    pub async fn len(&self) -> usize {
        self.shared.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.store.read().await.is_empty()
    }
}
