//! Per-order lock registry.
//!
//! Serializes "read status, decide, commit" for one order across the
//! redirect and webhook paths. Different orders never contend. Entries are
//! weak, so a lock nobody holds or waits on is dropped on the next acquire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::OrderId;

/// Holds the lock for one order until dropped.
pub struct OrderLockGuard {
    order_id: OrderId,
    _guard: OwnedMutexGuard<()>,
}

impl OrderLockGuard {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

/// Registry of keyed async mutexes.
#[derive(Default)]
pub struct OrderLocks {
    entries: Mutex<HashMap<OrderId, Weak<AsyncMutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `order_id`.
    pub async fn acquire(&self, order_id: OrderId) -> OrderLockGuard {
        let lock = self.lock_for(order_id);
        OrderLockGuard {
            order_id,
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of orders with a live lock (held or awaited).
    #[cfg(test)]
    fn tracked(&self) -> usize {
        let entries = self.entries();
        entries.values().filter(|w| w.strong_count() > 0).count()
    }

    fn lock_for(&self, order_id: OrderId) -> Arc<AsyncMutex<()>> {
        let mut entries = self.entries();
        entries.retain(|_, weak| weak.strong_count() > 0);

        if let Some(lock) = entries.get(&order_id).and_then(Weak::upgrade) {
            return lock;
        }
        let lock = Arc::new(AsyncMutex::new(()));
        entries.insert(order_id, Arc::downgrade(&lock));
        lock
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<OrderId, Weak<AsyncMutex<()>>>> {
        // The map stays consistent even if a holder panicked.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
