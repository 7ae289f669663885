// ============================================================
// Layer 2 — Per-Record Locks
// ============================================================
// Read-check-write sequences on one NDA record (load metadata,
// check the status guard, write artifacts, save metadata) must
// not interleave. Each record id gets its own mutex; different
// ids never wait on each other.
//
// Entries are dropped again once nobody holds or waits on them,
// so the registry does not grow with every id ever touched.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct RecordLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with_lock<T>(&self, id: Uuid, f: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(self.locks.lock().entry(id).or_default());

        let result = {
            let _guard = lock.lock();
            f()
        };

        let mut locks = self.locks.lock();
        // The registry's own copy plus ours: nobody else is waiting.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
        result
    }

    /// Number of ids currently tracked.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
