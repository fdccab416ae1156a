//! Per-record lock registry.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Serializes read-modify-write sequences on a single verification record.
///
/// Each record id maps to its own async mutex; holding the guard keeps
/// every other verify/resend/sweep touching the same id waiting, while
/// operations on distinct ids proceed independently. The registry mutex
/// is only held long enough to look up or insert the per-key lock.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one record id, waiting if another operation
    /// on the same id is in flight.
    pub async fn acquire(&self, verification_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(verification_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drops registry entries whose lock is not currently held anywhere.
    /// Called after sweep passes to keep the registry from growing with
    /// the total number of ids ever seen.
    pub async fn prune(&self) -> usize {
        let mut locks = self.locks.lock().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequential_acquire_release() {
        let locks = KeyLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        drop(guard);
        let _guard = locks.acquire(id).await;
    }

    #[tokio::test]
    async fn test_prune_drops_idle_entries_only() {
        let locks = KeyLocks::new();
        let held_id = Uuid::new_v4();
        let idle_id = Uuid::new_v4();

        let guard = locks.acquire(held_id).await;
        drop(locks.acquire(idle_id).await);
        assert_eq!(locks.len().await, 2);

        let pruned = locks.prune().await;
        assert_eq!(pruned, 1);
        assert_eq!(locks.len().await, 1);
        drop(guard);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block_each_other() {
        let locks = KeyLocks::new();
        let _guard_a = locks.acquire(Uuid::new_v4()).await;
        // Must not deadlock while another key's guard is held
        let _guard_b = locks.acquire(Uuid::new_v4()).await;
    }
}
