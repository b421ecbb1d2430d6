//! Per-user async locks: one writer per user, no cross-user contention.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    /// Waits for exclusive access to `user_id`; released when the guard drops.
    pub(crate) async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // drop slots nobody holds or waits on
            map.retain(|key, slot| key == user_id || Arc::strong_count(slot) > 1);
            map.entry(user_id.to_string()).or_default().clone()
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_serialized() {
        let locks = Arc::new(UserLocks::default());
        let guard = locks.lock("u1").await;

        let locks2 = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.lock("u1").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_user_not_blocked() {
        let locks = UserLocks::default();
        let _g1 = locks.lock("u1").await;
        let acquired = tokio::time::timeout(Duration::from_millis(100), locks.lock("u2")).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_idle_slots_pruned() {
        let locks = UserLocks::default();
        drop(locks.lock("u1").await);
        drop(locks.lock("u2").await);
        drop(locks.lock("u3").await);
        assert_eq!(locks.len(), 1);
    }
}
