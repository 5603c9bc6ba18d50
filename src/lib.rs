//! addcache - A process-local key-value cache
//!
//! Values are stored behind `Arc` with optional per-entry expiry. Expired
//! entries are removed lazily when read and eagerly by a background sweep,
//! and Create/Delete hooks fire once per logical event on either path.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{create_key, create_key_with_delimiter, hook, Cache, Hook, Operation};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
