//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and lifecycle hooks.

mod entry;
mod handle;
mod hooks;
mod key;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use hooks::{hook, Hook, HookRegistry, Operation};
pub use key::{create_key, create_key_with_delimiter, DEFAULT_DELIMITER};
pub use store::{CacheStore, Lookup};

pub(crate) use handle::Shared;
