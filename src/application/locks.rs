use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes work on a single transaction reference.
///
/// Locks for different references never contend. Entries nobody holds or
/// waits on are pruned on the next acquisition.
#[derive(Default, Clone)]
pub struct ReferenceLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ReferenceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `reference`; released when the guard drops.
    pub async fn acquire(&self, reference: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(reference.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of references currently tracked.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
