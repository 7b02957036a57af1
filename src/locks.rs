use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One exclusive lock per scope key.
///
/// The guard is held across the model call, so it must be an async mutex.
/// Different keys never contend.
#[derive(Debug, Default)]
pub struct ScopeLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

pub type ScopeGuard = OwnedMutexGuard<()>;

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `scope` is free. The lock is released when the guard drops.
    pub async fn acquire(&self, scope: &str) -> ScopeGuard {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // Entries nobody else holds a handle to can go.
            locks.retain(|key, lock| key.as_str() == scope || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(scope.to_string()).or_default())
        };
        log::debug!("Acquiring lock for scope: {scope}");
        let guard = lock.lock_owned().await;
        log::debug!("Lock acquired for scope: {scope}");
        guard
    }
}
