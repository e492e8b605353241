//! Cancellable change subscriptions
//!
//! Used for both menu change notifications and auth state changes.
//!
//! Dispatch holds the read side of the registry lock and `unsubscribe` takes
//! the write side, so once `unsubscribe` returns the handler is never called
//! again. Handlers must not call `unsubscribe` (or `subscribe`) on the same
//! registry from inside their callback.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Handle returned by `subscribe`, passed back to `unsubscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

pub type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Registry of event handlers
pub struct Subscribers<E> {
    next_id: AtomicU64,
    handlers: RwLock<BTreeMap<SubscriptionToken, Handler<E>>>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let token = SubscriptionToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().insert(token, Box::new(handler));
        token
    }

    /// Remove a handler. Returns `false` if the token was unknown.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.handlers.write().remove(&token).is_some()
    }

    /// Call every handler in subscription order
    pub fn notify(&self, event: &E) {
        let handlers = self.handlers.read();
        for handler in handlers.values() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("handlers", &self.len())
            .finish()
    }
}
