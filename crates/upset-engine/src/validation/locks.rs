//! Per-pattern write serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per pattern name. Updates to the same name queue up;
/// different names proceed in parallel.
#[derive(Debug, Default)]
pub struct PatternLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PatternLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `name`. Held until the guard drops.
    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        // The map shard lock must be released before awaiting.
        let lock = Arc::clone(&*self.locks.entry(name.to_string()).or_default());
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
