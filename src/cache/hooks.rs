//! Hook Registry Module
//!
//! Lifecycle callbacks keyed by the operation that triggers them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// == Operation ==
/// Lifecycle event a hook can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// An entry was inserted or overwritten
    Create,
    /// An entry was removed, explicitly or by expiration
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.write_str("Create"),
            Operation::Delete => f.write_str("Delete"),
        }
    }
}

/// Callback receiving a read-only view of the affected entry.
pub type Hook<V> = Arc<dyn Fn(&str, &V) + Send + Sync + 'static>;

/// Wraps a closure as a [`Hook`], for passing several to `set_hook`.
pub fn hook<V, F>(f: F) -> Hook<V>
where
    F: Fn(&str, &V) + Send + Sync + 'static,
{
    Arc::new(f)
}

// == Hook Registry ==
/// Ordered handler lists per operation. Registration only appends.
pub struct HookRegistry<V> {
    handlers: HashMap<Operation, Vec<Hook<V>>>,
}

impl<V> HookRegistry<V> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Appends handlers after any already registered for `operation`.
    pub fn register<I>(&mut self, operation: Operation, hooks: I)
    where
        I: IntoIterator<Item = Hook<V>>,
    {
        self.handlers.entry(operation).or_default().extend(hooks);
    }

    /// Number of handlers registered for `operation`.
    pub fn count(&self, operation: Operation) -> usize {
        self.handlers.get(&operation).map_or(0, Vec::len)
    }

    /// Invokes every handler for `operation` in registration order.
    ///
    /// Handlers run inline; a panicking handler unwinds through the caller.
    pub fn dispatch(&self, operation: Operation, key: &str, value: &V) {
        if let Some(hooks) = self.handlers.get(&operation) {
            for hook in hooks {
                hook(key, value);
            }
        }
    }
}

impl<V> Default for HookRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for HookRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("create", &self.count(Operation::Create))
            .field("delete", &self.count(Operation::Delete))
            .finish()
    }
}
